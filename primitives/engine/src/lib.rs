#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `irbridge-engine` — Compiler Engine Boundary
//!
//! This crate declares the **complete, enumerated interface** irbridge uses to
//! reach the external compiler-IR engine. Every entry point the engine
//! exposes appears once on [`CompilerEngine`] with a fixed signature, so the
//! boundary can be audited by reading one trait.
//!
//! ## Core Concepts
//!
//! ### `CompilerEngine` Trait
//! One method per engine entry point, taking already-encoded text
//! ([`encoding::EncodedText`]), booleans, and native lists, and returning the
//! engine's raw [`ResultBuffer`]. Optional text is `Option<&EncodedText>`:
//! absent and empty are different arguments.
//!
//! Backends either implement the entry points directly (in-process engines)
//! or implement [`CompilerEngine::dispatch`] only, in which case every entry
//! point arrives as an [`EngineCall`] record (subprocess and dry-run
//! backends).
//!
//! ### `EngineError`
//! Failures surfaced by the engine. They are opaque to irbridge and are
//! handed back to callers unchanged.
//!
//! ### `DynEngine`
//! A shared, type-erased (`Arc<dyn CompilerEngine>`) engine.
//!
//! ## Feature Flags
//! - `test-utils` (default): exposes [`RecordingEngine`], an engine that
//!   stores every call it receives.

use std::sync::Arc;

use context::RuntimeHandle;
use encoding::EncodedText;

mod buffer;
mod call;
#[cfg(feature = "test-utils")]
mod recording;

pub use buffer::ResultBuffer;
pub use call::{EngineCall, GraphArrays};
#[cfg(feature = "test-utils")]
pub use recording::RecordingEngine;

/// Type alias for engine call results.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Canonical error type for engine failures.
///
/// The facade never inspects or rewrites these; parse, verification, I/O,
/// and shape-mismatch failures all arrive here exactly as the engine reported
/// them.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// An engine tool ran and reported failure.
    #[error("`{tool}` failed ({}): {stderr}", describe_status(.status))]
    Tool {
        /// Tool that failed.
        tool: String,
        /// Exit code, if the tool exited normally.
        status: Option<i32>,
        /// Diagnostics the tool printed, verbatim.
        stderr: String,
    },

    /// An engine tool could not be started at all.
    #[error("failed to launch `{tool}`: {source}")]
    Spawn {
        /// Tool that could not be started.
        tool: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The engine rejected the call with a diagnostic message.
    #[error("{0}")]
    Rejected(String),

    /// The backend cannot service this entry point.
    #[error("{entry_point} is not supported by the {engine} engine")]
    Unsupported {
        /// Backend name.
        engine: String,
        /// Entry point that was requested.
        entry_point: &'static str,
    },

    /// Failure to serialize a call record.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Local I/O failure while staging engine inputs or outputs.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self { EngineError::Serialization(err.to_string()) }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// The external compiler engine, one method per entry point.
///
/// Calls are synchronous and blocking. Implementations must not retry.
pub trait CompilerEngine: Send + Sync {
    /// Stable identifier for this backend.
    fn name(&self) -> &str;

    /// Service an entry point described as a call record.
    ///
    /// Every entry point's default implementation forwards here.
    fn dispatch(&self, call: EngineCall) -> Result<ResultBuffer>;

    /// `ImportGraphDef`: import a serialized graph.
    ///
    /// `arrays` is `None` for the three-argument form and `Some` for the
    /// seven-argument form.
    fn import_graphdef(
        &self,
        graphdef: &EncodedText,
        pass_pipeline: Option<&EncodedText>,
        show_debug_info: bool,
        arrays: Option<&GraphArrays>,
    ) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::ImportGraphDef {
            graphdef: graphdef.clone(),
            pass_pipeline: pass_pipeline.cloned(),
            show_debug_info,
            arrays: arrays.cloned(),
        })
    }

    /// `ImportFunction`: import a function definition into an initialized runtime.
    fn import_function(
        &self,
        handle: RuntimeHandle,
        function_def: &EncodedText,
        pass_pipeline: Option<&EncodedText>,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::ImportFunction {
            handle,
            function_def: function_def.clone(),
            pass_pipeline: pass_pipeline.cloned(),
            show_debug_info,
        })
    }

    /// `ExperimentalConvertSavedModelToMlir`.
    fn convert_saved_model(
        &self,
        saved_model_path: &EncodedText,
        exported_names: Option<&EncodedText>,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::ConvertSavedModel {
            saved_model_path: saved_model_path.clone(),
            exported_names: exported_names.cloned(),
            show_debug_info,
        })
    }

    /// `ExperimentalConvertSavedModelV1ToMlirLite`.
    fn convert_saved_model_v1_lite(
        &self,
        saved_model_path: &EncodedText,
        exported_names: Option<&EncodedText>,
        tags: Option<&EncodedText>,
        upgrade_legacy: bool,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::ConvertSavedModelV1Lite {
            saved_model_path: saved_model_path.clone(),
            exported_names: exported_names.cloned(),
            tags: tags.cloned(),
            upgrade_legacy,
            show_debug_info,
        })
    }

    /// `ExperimentalConvertSavedModelV1ToMlir`.
    #[allow(clippy::too_many_arguments)]
    fn convert_saved_model_v1(
        &self,
        saved_model_path: &EncodedText,
        exported_names: Option<&EncodedText>,
        tags: Option<&EncodedText>,
        lift_variables: bool,
        include_variables_in_initializers: bool,
        upgrade_legacy: bool,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::ConvertSavedModelV1 {
            saved_model_path: saved_model_path.clone(),
            exported_names: exported_names.cloned(),
            tags: tags.cloned(),
            lift_variables,
            include_variables_in_initializers,
            upgrade_legacy,
            show_debug_info,
        })
    }

    /// `ExperimentalRunPassPipeline`.
    fn run_pass_pipeline(
        &self,
        mlir_txt: &EncodedText,
        pass_pipeline: &EncodedText,
        show_debug_info: bool,
    ) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::RunPassPipeline {
            mlir_txt: mlir_txt.clone(),
            pass_pipeline: pass_pipeline.clone(),
            show_debug_info,
        })
    }

    /// `ExperimentalWriteBytecode`.
    fn write_bytecode(&self, filename: &EncodedText, mlir_txt: &EncodedText) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::WriteBytecode {
            filename: filename.clone(),
            mlir_txt: mlir_txt.clone(),
        })
    }

    /// `ExperimentalTFLiteToTosaBytecode`.
    ///
    /// The ordered array lists are native lists, not joined text.
    fn tflite_to_tosa_bytecode(
        &self,
        flatbuffer: &EncodedText,
        bytecode: &EncodedText,
        use_external_constant: bool,
        ordered_input_arrays: &[String],
        ordered_output_arrays: &[String],
    ) -> Result<ResultBuffer> {
        self.dispatch(EngineCall::TfliteToTosaBytecode {
            flatbuffer: flatbuffer.clone(),
            bytecode: bytecode.clone(),
            use_external_constant,
            ordered_input_arrays: ordered_input_arrays.to_vec(),
            ordered_output_arrays: ordered_output_arrays.to_vec(),
        })
    }
}

/// Type alias for a shared, dynamically dispatched engine.
///
/// ```
/// use engine::{CompilerEngine, DynEngine};
///
/// fn describe(engine: &DynEngine) -> String { format!("engine: {}", engine.name()) }
/// ```
pub type DynEngine = Arc<dyn CompilerEngine>;
