#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `irbridge-context` — Engine Execution Context
//!
//! Some engine entry points (function import) need a live runtime instance.
//! This crate provides the one piece of process-wide state in irbridge: a
//! lazily initialized [`ExecutionContext`] whose [`RuntimeHandle`] is created
//! exactly once, on first use, and lives until the process exits.
//!
//! Initialization is a guarded lazy init (`OnceLock`). The first caller of
//! [`ExecutionContext::ensure_initialized`] runs the initializer; concurrent
//! callers block until it finishes and then observe the same handle. No lock
//! is held once the handle exists.
//!
//! ## Example
//! ```
//! use context::{ContextProvider, GlobalContext};
//!
//! let ctx = GlobalContext.context();
//! let handle = ctx.ensure_initialized();
//! assert_eq!(ctx.handle(), Some(handle));
//! assert_eq!(ctx.ensure_initialized(), handle);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Opaque handle to an initialized engine runtime instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeHandle(u64);

impl RuntimeHandle {
    /// Wrap a raw handle value handed out by an engine runtime.
    pub const fn from_raw(raw: u64) -> Self { Self(raw) }

    /// The raw value forwarded to the engine.
    pub const fn as_raw(&self) -> u64 { self.0 }
}

impl fmt::Display for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "runtime#{}", self.0) }
}

type Initializer = Box<dyn Fn() -> RuntimeHandle + Send + Sync>;

/// An engine runtime instance that is initialized at most once.
pub struct ExecutionContext {
    handle: OnceLock<RuntimeHandle>,
    init: Initializer,
}

impl ExecutionContext {
    /// A context whose runtime handle is allocated from a process-wide counter.
    pub fn new() -> Self { Self::with_initializer(allocate_handle) }

    /// A context that runs `init` to create its runtime handle.
    pub fn with_initializer(init: impl Fn() -> RuntimeHandle + Send + Sync + 'static) -> Self {
        Self { handle: OnceLock::new(), init: Box::new(init) }
    }

    /// Initialize the runtime if nobody has yet, and return its handle.
    ///
    /// Idempotent and safe to call from many threads at once.
    pub fn ensure_initialized(&self) -> RuntimeHandle { *self.handle.get_or_init(|| (self.init)()) }

    /// The runtime handle, or `None` before initialization.
    pub fn handle(&self) -> Option<RuntimeHandle> { self.handle.get().copied() }

    /// Whether the runtime has been initialized.
    pub fn is_initialized(&self) -> bool { self.handle.get().is_some() }
}

impl Default for ExecutionContext {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext").field("handle", &self.handle.get()).finish_non_exhaustive()
    }
}

fn allocate_handle() -> RuntimeHandle {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    let handle = RuntimeHandle(NEXT.fetch_add(1, Ordering::Relaxed));
    tracing::info!(%handle, "execution context initialized");
    handle
}

/// Source of the execution context used by callers that need a runtime.
pub trait ContextProvider: Send + Sync {
    /// The execution context, possibly not yet initialized.
    fn context(&self) -> &ExecutionContext;

    /// Initialize the provided context if needed and return its handle.
    fn ensure_initialized(&self) -> RuntimeHandle { self.context().ensure_initialized() }

    /// The provided context's handle, or `None` before initialization.
    fn handle(&self) -> Option<RuntimeHandle> { self.context().handle() }
}

impl ContextProvider for ExecutionContext {
    fn context(&self) -> &ExecutionContext { self }
}

/// The process-wide execution context.
///
/// Created on first access and never torn down.
pub fn global() -> &'static ExecutionContext {
    static GLOBAL: OnceLock<ExecutionContext> = OnceLock::new();
    GLOBAL.get_or_init(ExecutionContext::new)
}

/// [`ContextProvider`] backed by [`global()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalContext;

impl ContextProvider for GlobalContext {
    fn context(&self) -> &ExecutionContext { global() }
}
