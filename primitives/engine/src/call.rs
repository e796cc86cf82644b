//! Call records: one marshalled engine invocation, as data.

use context::RuntimeHandle;
use encoding::EncodedText;
use serde::{Deserialize, Serialize};

/// Joined structural lists for the seven-argument graph import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphArrays {
    /// Input node names joined with `,`.
    pub input_names: EncodedText,
    /// Input data types joined with `,`.
    pub input_data_types: EncodedText,
    /// Input shape descriptors joined with `:`.
    pub input_data_shapes: EncodedText,
    /// Output node names joined with `,`.
    pub output_names: EncodedText,
}

/// A fully marshalled engine call.
///
/// Serialized with the engine's own entry point name as the tag; absent
/// optional text serializes as `null`, empty text as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entry_point")]
pub enum EngineCall {
    /// See [`crate::CompilerEngine::import_graphdef`].
    #[serde(rename = "ImportGraphDef")]
    ImportGraphDef {
        /// Graph definition text.
        graphdef: EncodedText,
        /// Pass pipeline to run after import.
        pass_pipeline: Option<EncodedText>,
        /// Print location info.
        show_debug_info: bool,
        /// Structural lists; `None` selects the short form.
        arrays: Option<GraphArrays>,
    },
    /// See [`crate::CompilerEngine::import_function`].
    #[serde(rename = "ImportFunction")]
    ImportFunction {
        /// Initialized runtime.
        handle: RuntimeHandle,
        /// Textual function definition.
        function_def: EncodedText,
        /// Pass pipeline to run after import.
        pass_pipeline: Option<EncodedText>,
        /// Print location info.
        show_debug_info: bool,
    },
    /// See [`crate::CompilerEngine::convert_saved_model`].
    #[serde(rename = "ExperimentalConvertSavedModelToMlir")]
    ConvertSavedModel {
        /// Saved model directory.
        saved_model_path: EncodedText,
        /// Exported-name filter.
        exported_names: Option<EncodedText>,
        /// Print location info.
        show_debug_info: bool,
    },
    /// See [`crate::CompilerEngine::convert_saved_model_v1_lite`].
    #[serde(rename = "ExperimentalConvertSavedModelV1ToMlirLite")]
    ConvertSavedModelV1Lite {
        /// Saved model directory.
        saved_model_path: EncodedText,
        /// Exported-name filter.
        exported_names: Option<EncodedText>,
        /// Meta-graph tag filter.
        tags: Option<EncodedText>,
        /// Upgrade legacy graph constructs.
        upgrade_legacy: bool,
        /// Print location info.
        show_debug_info: bool,
    },
    /// See [`crate::CompilerEngine::convert_saved_model_v1`].
    #[serde(rename = "ExperimentalConvertSavedModelV1ToMlir")]
    ConvertSavedModelV1 {
        /// Saved model directory.
        saved_model_path: EncodedText,
        /// Exported-name filter.
        exported_names: Option<EncodedText>,
        /// Meta-graph tag filter.
        tags: Option<EncodedText>,
        /// Lift variables into function arguments.
        lift_variables: bool,
        /// Keep variables in the session initializer.
        include_variables_in_initializers: bool,
        /// Upgrade legacy graph constructs.
        upgrade_legacy: bool,
        /// Print location info.
        show_debug_info: bool,
    },
    /// See [`crate::CompilerEngine::run_pass_pipeline`].
    #[serde(rename = "ExperimentalRunPassPipeline")]
    RunPassPipeline {
        /// IR text.
        mlir_txt: EncodedText,
        /// Pass pipeline description.
        pass_pipeline: EncodedText,
        /// Print location info.
        show_debug_info: bool,
    },
    /// See [`crate::CompilerEngine::write_bytecode`].
    #[serde(rename = "ExperimentalWriteBytecode")]
    WriteBytecode {
        /// Destination path.
        filename: EncodedText,
        /// IR text.
        mlir_txt: EncodedText,
    },
    /// See [`crate::CompilerEngine::tflite_to_tosa_bytecode`].
    #[serde(rename = "ExperimentalTFLiteToTosaBytecode")]
    TfliteToTosaBytecode {
        /// Source flat-buffer model.
        flatbuffer: EncodedText,
        /// Destination bytecode path.
        bytecode: EncodedText,
        /// Store constants outside the bytecode.
        use_external_constant: bool,
        /// Input array names, in order.
        ordered_input_arrays: Vec<String>,
        /// Output array names, in order.
        ordered_output_arrays: Vec<String>,
    },
}

impl EngineCall {
    /// The engine's name for this entry point.
    pub fn entry_point(&self) -> &'static str {
        match self {
            EngineCall::ImportGraphDef { .. } => "ImportGraphDef",
            EngineCall::ImportFunction { .. } => "ImportFunction",
            EngineCall::ConvertSavedModel { .. } => "ExperimentalConvertSavedModelToMlir",
            EngineCall::ConvertSavedModelV1Lite { .. } => "ExperimentalConvertSavedModelV1ToMlirLite",
            EngineCall::ConvertSavedModelV1 { .. } => "ExperimentalConvertSavedModelV1ToMlir",
            EngineCall::RunPassPipeline { .. } => "ExperimentalRunPassPipeline",
            EngineCall::WriteBytecode { .. } => "ExperimentalWriteBytecode",
            EngineCall::TfliteToTosaBytecode { .. } => "ExperimentalTFLiteToTosaBytecode",
        }
    }

    /// Number of positional arguments forwarded to the entry point.
    pub fn arity(&self) -> usize {
        match self {
            EngineCall::ImportGraphDef { arrays: None, .. } => 3,
            EngineCall::ImportGraphDef { arrays: Some(_), .. } => 7,
            EngineCall::ImportFunction { .. } => 4,
            EngineCall::ConvertSavedModel { .. } => 3,
            EngineCall::ConvertSavedModelV1Lite { .. } => 5,
            EngineCall::ConvertSavedModelV1 { .. } => 7,
            EngineCall::RunPassPipeline { .. } => 3,
            EngineCall::WriteBytecode { .. } => 2,
            EngineCall::TfliteToTosaBytecode { .. } => 5,
        }
    }

    /// Total encoded text bytes carried by the call, for logging.
    pub fn payload_len(&self) -> usize {
        fn opt(text: &Option<EncodedText>) -> usize { text.as_ref().map_or(0, EncodedText::len) }

        match self {
            EngineCall::ImportGraphDef { graphdef, pass_pipeline, arrays, .. } => {
                graphdef.len()
                    + opt(pass_pipeline)
                    + arrays.as_ref().map_or(0, |a| {
                        a.input_names.len()
                            + a.input_data_types.len()
                            + a.input_data_shapes.len()
                            + a.output_names.len()
                    })
            }
            EngineCall::ImportFunction { function_def, pass_pipeline, .. } =>
                function_def.len() + opt(pass_pipeline),
            EngineCall::ConvertSavedModel { saved_model_path, exported_names, .. } =>
                saved_model_path.len() + opt(exported_names),
            EngineCall::ConvertSavedModelV1Lite { saved_model_path, exported_names, tags, .. }
            | EngineCall::ConvertSavedModelV1 { saved_model_path, exported_names, tags, .. } =>
                saved_model_path.len() + opt(exported_names) + opt(tags),
            EngineCall::RunPassPipeline { mlir_txt, pass_pipeline, .. } =>
                mlir_txt.len() + pass_pipeline.len(),
            EngineCall::WriteBytecode { filename, mlir_txt } => filename.len() + mlir_txt.len(),
            EngineCall::TfliteToTosaBytecode {
                flatbuffer,
                bytecode,
                ordered_input_arrays,
                ordered_output_arrays,
                ..
            } =>
                flatbuffer.len()
                    + bytecode.len()
                    + ordered_input_arrays.iter().map(String::len).sum::<usize>()
                    + ordered_output_arrays.iter().map(String::len).sum::<usize>(),
        }
    }
}
