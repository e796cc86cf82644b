//! The Binding Facade
//!
//! One method per engine entry point. Each method transcodes its textual
//! arguments, joins list arguments, and forwards everything to the engine in
//! the engine's positional order. No state is kept between calls.

use std::sync::Arc;

use context::{ContextProvider, GlobalContext};
use encoding::{encode, encode_optional, Text};
use engine::{CompilerEngine, DynEngine, ResultBuffer};

use crate::{
    BindingError, BindingResult, FunctionObject, GraphImportOptions, SavedModelV1Options,
    TosaOptions,
};

/// Facade: one public place to reach every engine entry point
pub struct BindingFacade {
    engine: DynEngine,
    contexts: Arc<dyn ContextProvider>,
}

impl BindingFacade {
    /// Create a facade over `engine` that uses the process-wide execution context.
    pub fn new(engine: DynEngine) -> Self { Self::with_context_provider(engine, Arc::new(GlobalContext)) }

    /// Create a facade with an explicit execution-context provider.
    pub fn with_context_provider(engine: DynEngine, contexts: Arc<dyn ContextProvider>) -> Self {
        Self { engine, contexts }
    }

    /// The engine calls are forwarded to.
    pub fn engine(&self) -> &DynEngine { &self.engine }

    /// Import a serialized graph.
    ///
    /// With no structural lists in `options` the engine's three-argument form
    /// is used; otherwise all lists are joined and the seven-argument form is
    /// used.
    pub fn import_graphdef<'a>(
        &self,
        graphdef: impl Into<Text<'a>>,
        pass_pipeline: Option<Text<'a>>,
        show_debug_info: bool,
        options: &GraphImportOptions,
    ) -> BindingResult<ResultBuffer> {
        let graphdef = encode("graphdef", graphdef)?;
        let pass_pipeline = encode_optional("pass_pipeline", pass_pipeline)?;
        let arrays = options.joined_arrays()?;

        self.forward("ImportGraphDef", graphdef.len(), |engine| {
            engine.import_graphdef(&graphdef, pass_pipeline.as_ref(), show_debug_info, arrays.as_ref())
        })
    }

    /// Import an in-process function.
    ///
    /// Initializes the execution context first (a no-op after the first
    /// call), then serializes the function to its textual definition.
    pub fn import_function<'a>(
        &self,
        function: &dyn FunctionObject,
        pass_pipeline: Option<Text<'a>>,
        show_debug_info: bool,
    ) -> BindingResult<ResultBuffer> {
        let handle = self.contexts.ensure_initialized();
        let function_def = encode("function_def", function.function_def().as_str())?;
        let pass_pipeline = encode_optional("pass_pipeline", pass_pipeline)?;

        self.forward("ImportFunction", function_def.len(), |engine| {
            engine.import_function(handle, &function_def, pass_pipeline.as_ref(), show_debug_info)
        })
    }

    /// Convert a saved model to IR.
    pub fn convert_saved_model<'a>(
        &self,
        saved_model_path: impl Into<Text<'a>>,
        exported_names: Option<Text<'a>>,
        show_debug_info: bool,
    ) -> BindingResult<ResultBuffer> {
        let saved_model_path = encode("saved_model_path", saved_model_path)?;
        let exported_names = encode_optional("exported_names", exported_names)?;

        self.forward("ExperimentalConvertSavedModelToMlir", saved_model_path.len(), |engine| {
            engine.convert_saved_model(&saved_model_path, exported_names.as_ref(), show_debug_info)
        })
    }

    /// Convert a legacy (v1) saved model to IR, lite variant.
    pub fn convert_saved_model_v1_lite<'a>(
        &self,
        saved_model_path: impl Into<Text<'a>>,
        exported_names: Option<Text<'a>>,
        tags: Option<Text<'a>>,
        upgrade_legacy: bool,
        show_debug_info: bool,
    ) -> BindingResult<ResultBuffer> {
        let saved_model_path = encode("saved_model_path", saved_model_path)?;
        let exported_names = encode_optional("exported_names", exported_names)?;
        let tags = encode_optional("tags", tags)?;

        self.forward("ExperimentalConvertSavedModelV1ToMlirLite", saved_model_path.len(), |engine| {
            engine.convert_saved_model_v1_lite(
                &saved_model_path,
                exported_names.as_ref(),
                tags.as_ref(),
                upgrade_legacy,
                show_debug_info,
            )
        })
    }

    /// Convert a legacy (v1) saved model to IR.
    pub fn convert_saved_model_v1<'a>(
        &self,
        saved_model_path: impl Into<Text<'a>>,
        exported_names: Option<Text<'a>>,
        tags: Option<Text<'a>>,
        options: &SavedModelV1Options,
        show_debug_info: bool,
    ) -> BindingResult<ResultBuffer> {
        let saved_model_path = encode("saved_model_path", saved_model_path)?;
        let exported_names = encode_optional("exported_names", exported_names)?;
        let tags = encode_optional("tags", tags)?;

        self.forward("ExperimentalConvertSavedModelV1ToMlir", saved_model_path.len(), |engine| {
            engine.convert_saved_model_v1(
                &saved_model_path,
                exported_names.as_ref(),
                tags.as_ref(),
                options.lift_variables,
                options.include_variables_in_initializers,
                options.upgrade_legacy,
                show_debug_info,
            )
        })
    }

    /// Run a pass pipeline over IR text.
    pub fn run_pass_pipeline<'a>(
        &self,
        mlir_txt: impl Into<Text<'a>>,
        pass_pipeline: impl Into<Text<'a>>,
        show_debug_info: bool,
    ) -> BindingResult<ResultBuffer> {
        let mlir_txt = encode("mlir_txt", mlir_txt)?;
        let pass_pipeline = encode("pass_pipeline", pass_pipeline)?;

        self.forward("ExperimentalRunPassPipeline", mlir_txt.len(), |engine| {
            engine.run_pass_pipeline(&mlir_txt, &pass_pipeline, show_debug_info)
        })
    }

    /// Write IR text to `filename` as bytecode.
    pub fn write_bytecode<'a>(
        &self,
        filename: impl Into<Text<'a>>,
        mlir_txt: impl Into<Text<'a>>,
    ) -> BindingResult<ResultBuffer> {
        let filename = encode("filename", filename)?;
        let mlir_txt = encode("mlir_txt", mlir_txt)?;

        self.forward("ExperimentalWriteBytecode", mlir_txt.len(), |engine| {
            engine.write_bytecode(&filename, &mlir_txt)
        })
    }

    /// Convert a flat-buffer model to bytecode written at `bytecode`.
    pub fn tflite_to_tosa_bytecode<'a>(
        &self,
        flatbuffer: impl Into<Text<'a>>,
        bytecode: impl Into<Text<'a>>,
        options: &TosaOptions,
    ) -> BindingResult<ResultBuffer> {
        let flatbuffer = encode("flatbuffer", flatbuffer)?;
        let bytecode = encode("bytecode", bytecode)?;

        self.forward("ExperimentalTFLiteToTosaBytecode", flatbuffer.len(), |engine| {
            engine.tflite_to_tosa_bytecode(
                &flatbuffer,
                &bytecode,
                options.use_external_constant,
                options.input_arrays(),
                options.output_arrays(),
            )
        })
    }

    fn forward(
        &self,
        entry_point: &'static str,
        payload_bytes: usize,
        call: impl FnOnce(&dyn CompilerEngine) -> engine::Result<ResultBuffer>,
    ) -> BindingResult<ResultBuffer> {
        tracing::debug!(engine = self.engine.name(), entry_point, payload_bytes, "forwarding call");

        match call(self.engine.as_ref()) {
            Ok(buffer) => {
                tracing::debug!(entry_point, result_bytes = buffer.len(), "engine returned");
                Ok(buffer)
            }
            Err(e) => {
                logging::trace("facade", &format!("{} failed: {}", entry_point, e));
                Err(BindingError::Engine(e))
            }
        }
    }
}
