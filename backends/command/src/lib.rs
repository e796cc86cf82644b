#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `irbridge-command` — Subprocess Engine Backend
//!
//! Concrete [`engine::CompilerEngine`] implementations that do not link the
//! compiler engine into the process:
//!
//! - [`CommandEngine`] spawns the engine's standalone tools
//!   (`tf-mlir-translate`, `tf-opt`, `flatbuffer_translate`) and returns
//!   their stdout as the result buffer
//! - [`DryRunEngine`] returns the marshalled call as JSON without running
//!   anything
//!
//! Input text is staged in temporary files; tool failures surface as
//! [`engine::EngineError::Tool`] with the tool's stderr verbatim.
//!
//! ## Example
//! ```no_run
//! use command::CommandEngine;
//! use config::ToolPaths;
//! use encoding::encode;
//! use engine::CompilerEngine;
//!
//! let engine = CommandEngine::new(ToolPaths::default());
//! let mlir = encode("mlir_txt", "module {}").unwrap();
//! let pipeline = encode("pass_pipeline", "builtin.module(canonicalize)").unwrap();
//! let out = engine.run_pass_pipeline(&mlir, &pipeline, false).unwrap();
//! println!("{}", out.to_text_lossy());
//! ```

use std::sync::Arc;

use config::{BackendKind, EngineConfig, ToolPaths};
use encoding::{join_names, EncodedText};
use engine::{CompilerEngine, DynEngine, EngineCall, EngineError, GraphArrays, Result, ResultBuffer};

pub mod dry_run;
pub mod flags;
mod invocation;

pub use dry_run::DryRunEngine;

use invocation::{stage, Invocation};

/// Build the engine selected by `config`.
pub fn engine_from_config(config: &EngineConfig) -> DynEngine {
    tracing::debug!(backend = %config.backend, "selecting engine backend");
    match config.backend {
        BackendKind::Command => Arc::new(CommandEngine::new(config.tools.clone())),
        BackendKind::DryRun => Arc::new(DryRunEngine),
    }
}

/// Engine that runs the standalone compiler tools as subprocesses.
///
/// Calls are synchronous and blocking. Nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct CommandEngine {
    tools: ToolPaths,
}

impl CommandEngine {
    /// Use the tools at `tools`.
    pub fn new(tools: ToolPaths) -> Self { Self { tools } }

    /// Tool locations in use.
    pub fn tools(&self) -> &ToolPaths { &self.tools }

    fn graphdef_to_mlir(
        &self,
        graphdef: &EncodedText,
        pass_pipeline: Option<&EncodedText>,
        show_debug_info: bool,
        arrays: Option<&GraphArrays>,
    ) -> Result<ResultBuffer> {
        let input = stage(graphdef.as_bytes(), ".pbtxt")?;

        let mut translate = Invocation::new(&self.tools.translate).arg(flags::GRAPHDEF_TO_MLIR);
        if let Some(arrays) = arrays {
            translate = translate
                .assign(flags::INPUT_ARRAYS, arrays.input_names.as_str())
                .assign(flags::INPUT_DATA_TYPES, arrays.input_data_types.as_str())
                .assign(flags::INPUT_SHAPES, arrays.input_data_shapes.as_str())
                .assign(flags::OUTPUT_ARRAYS, arrays.output_names.as_str());
        }
        let imported =
            translate.switch(flags::PRINT_DEBUGINFO, show_debug_info).arg(input.path()).run()?;

        match pass_pipeline.filter(|p| !p.is_empty()) {
            Some(pipeline) => self.opt_pass_pipeline(&imported, pipeline, show_debug_info),
            None => Ok(imported.into()),
        }
    }

    fn objectgraph_to_mlir(
        &self,
        saved_model_path: &EncodedText,
        exported_names: Option<&EncodedText>,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        let out = Invocation::new(&self.tools.translate)
            .arg(flags::SAVEDMODEL_OBJECTGRAPH)
            .assign_opt(flags::EXPORTED_NAMES, exported_names.map(EncodedText::as_str))
            .switch(flags::PRINT_DEBUGINFO, show_debug_info)
            .arg(saved_model_path)
            .run()?;
        Ok(out.into())
    }

    fn signaturedefs_to_mlir_lite(
        &self,
        saved_model_path: &EncodedText,
        exported_names: Option<&EncodedText>,
        tags: Option<&EncodedText>,
        upgrade_legacy: bool,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        let out = Invocation::new(&self.tools.translate)
            .arg(flags::SAVEDMODEL_SIGNATUREDEFS_LITE)
            .assign_opt(flags::EXPORTED_NAMES, exported_names.map(EncodedText::as_str))
            .assign_opt(flags::SAVEDMODEL_TAGS, tags.map(EncodedText::as_str))
            .boolean(flags::UPGRADE_LEGACY, upgrade_legacy)
            .switch(flags::PRINT_DEBUGINFO, show_debug_info)
            .arg(saved_model_path)
            .run()?;
        Ok(out.into())
    }

    #[allow(clippy::too_many_arguments)]
    fn signaturedefs_to_mlir(
        &self,
        saved_model_path: &EncodedText,
        exported_names: Option<&EncodedText>,
        tags: Option<&EncodedText>,
        lift_variables: bool,
        include_variables_in_initializers: bool,
        upgrade_legacy: bool,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        let out = Invocation::new(&self.tools.translate)
            .arg(flags::SAVEDMODEL_SIGNATUREDEFS)
            .assign_opt(flags::EXPORTED_NAMES, exported_names.map(EncodedText::as_str))
            .assign_opt(flags::SAVEDMODEL_TAGS, tags.map(EncodedText::as_str))
            .boolean(flags::LIFT_VARIABLES, lift_variables)
            .boolean(flags::INCLUDE_VARIABLES_IN_INITIALIZERS, include_variables_in_initializers)
            .boolean(flags::UPGRADE_LEGACY, upgrade_legacy)
            .switch(flags::PRINT_DEBUGINFO, show_debug_info)
            .arg(saved_model_path)
            .run()?;
        Ok(out.into())
    }

    fn opt_pass_pipeline(
        &self,
        mlir_txt: &[u8],
        pass_pipeline: &EncodedText,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        let input = stage(mlir_txt, ".mlir")?;
        let out = Invocation::new(&self.tools.opt)
            .assign(flags::PASS_PIPELINE, pass_pipeline.as_str())
            .switch(flags::PRINT_DEBUGINFO, show_debug_info)
            .arg(input.path())
            .run()?;
        Ok(out.into())
    }

    fn emit_bytecode(&self, filename: &EncodedText, mlir_txt: &EncodedText) -> Result<ResultBuffer> {
        let input = stage(mlir_txt.as_bytes(), ".mlir")?;
        Invocation::new(&self.tools.opt)
            .arg(flags::EMIT_BYTECODE)
            .arg(flags::OUTPUT)
            .arg(filename)
            .arg(input.path())
            .run()?;
        Ok(ResultBuffer::default())
    }

    fn flatbuffer_to_tosa(
        &self,
        flatbuffer: &EncodedText,
        bytecode: &EncodedText,
        use_external_constant: bool,
        ordered_input_arrays: &[String],
        ordered_output_arrays: &[String],
    ) -> Result<ResultBuffer> {
        let imported = Invocation::new(&self.tools.flatbuffer_translate)
            .arg(flags::TFLITE_FLATBUFFER_TO_MLIR)
            .assign_opt(flags::TFLITE_INPUT_ARRAYS, non_empty(ordered_input_arrays).as_deref())
            .assign_opt(flags::TFLITE_OUTPUT_ARRAYS, non_empty(ordered_output_arrays).as_deref())
            .arg(flatbuffer)
            .run()?;

        let input = stage(&imported, ".mlir")?;
        Invocation::new(&self.tools.opt)
            .arg(flags::TFL_TO_TOSA_PIPELINE)
            .switch(flags::TOSA_EXTERNAL_CONSTANT, use_external_constant)
            .arg(flags::EMIT_BYTECODE)
            .arg(flags::OUTPUT)
            .arg(bytecode)
            .arg(input.path())
            .run()?;
        Ok(ResultBuffer::default())
    }
}

fn non_empty(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(join_names(items))
    }
}

impl CompilerEngine for CommandEngine {
    fn name(&self) -> &str { "command" }

    fn dispatch(&self, call: EngineCall) -> Result<ResultBuffer> {
        tracing::debug!(entry_point = call.entry_point(), "dispatching to engine tools");

        match call {
            EngineCall::ImportGraphDef { graphdef, pass_pipeline, show_debug_info, arrays } =>
                self.graphdef_to_mlir(&graphdef, pass_pipeline.as_ref(), show_debug_info, arrays.as_ref()),
            EngineCall::ImportFunction { .. } => Err(EngineError::Unsupported {
                engine: self.name().to_string(),
                entry_point: call.entry_point(),
            }),
            EngineCall::ConvertSavedModel { saved_model_path, exported_names, show_debug_info } =>
                self.objectgraph_to_mlir(&saved_model_path, exported_names.as_ref(), show_debug_info),
            EngineCall::ConvertSavedModelV1Lite {
                saved_model_path,
                exported_names,
                tags,
                upgrade_legacy,
                show_debug_info,
            } => self.signaturedefs_to_mlir_lite(
                &saved_model_path,
                exported_names.as_ref(),
                tags.as_ref(),
                upgrade_legacy,
                show_debug_info,
            ),
            EngineCall::ConvertSavedModelV1 {
                saved_model_path,
                exported_names,
                tags,
                lift_variables,
                include_variables_in_initializers,
                upgrade_legacy,
                show_debug_info,
            } => self.signaturedefs_to_mlir(
                &saved_model_path,
                exported_names.as_ref(),
                tags.as_ref(),
                lift_variables,
                include_variables_in_initializers,
                upgrade_legacy,
                show_debug_info,
            ),
            EngineCall::RunPassPipeline { mlir_txt, pass_pipeline, show_debug_info } =>
                self.opt_pass_pipeline(mlir_txt.as_bytes(), &pass_pipeline, show_debug_info),
            EngineCall::WriteBytecode { filename, mlir_txt } => self.emit_bytecode(&filename, &mlir_txt),
            EngineCall::TfliteToTosaBytecode {
                flatbuffer,
                bytecode,
                use_external_constant,
                ordered_input_arrays,
                ordered_output_arrays,
            } => self.flatbuffer_to_tosa(
                &flatbuffer,
                &bytecode,
                use_external_constant,
                &ordered_input_arrays,
                &ordered_output_arrays,
            ),
        }
    }
}
