#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Binding Facade Library
//!
//! This crate adapts host-side calling conventions (optional parameters,
//! lists, text that may not be valid UTF-8) into the fixed positional calling
//! convention of the external compiler engine, and hands back the engine's
//! raw output unchanged.
//!
//! The facade performs no validation of its own. The one failure it raises
//! locally is an encoding failure, which happens before the engine is called;
//! everything else is the engine's error, passed through untouched.
//!
//! ```
//! use std::sync::Arc;
//!
//! use engine::RecordingEngine;
//! use facade::{BindingFacade, GraphImportOptions};
//!
//! let recorder = Arc::new(RecordingEngine::replying("module {}"));
//! let facade = BindingFacade::new(recorder.clone());
//!
//! let out = facade.import_graphdef("node { name: \"x\" }", None, false, &GraphImportOptions::default())?;
//! assert_eq!(out.as_bytes(), b"module {}");
//! assert_eq!(recorder.last_call().map(|c| c.arity()), Some(3));
//! # Ok::<(), facade::BindingError>(())
//! ```

use encoding::EncodingError;
use engine::EngineError;
use thiserror::Error;

pub mod binding_facade;
pub mod function_object;
pub mod options;

pub use binding_facade::*;
pub use encoding::Text;
pub use engine::ResultBuffer;
pub use function_object::*;
pub use options::*;

/// Errors returned by facade operations.
#[derive(Debug, Error)]
pub enum BindingError {
    /// A textual argument could not be transcoded; the engine was not called.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// The engine reported a failure, passed through unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl BindingError {
    /// The engine's error, if this failure came from the engine.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            BindingError::Engine(e) => Some(e),
            BindingError::Encoding(_) => None,
        }
    }
}

/// Result alias for facade operations
pub type BindingResult<T> = std::result::Result<T, BindingError>;
