use std::sync::Mutex;

use crate::{CompilerEngine, EngineCall, EngineError, Result, ResultBuffer};

enum Reply {
    Buffer(ResultBuffer),
    Reject(String),
}

/// An engine that records every call it receives.
///
/// Replies with a fixed buffer, or rejects every call with a fixed message.
/// Used to observe exactly what crosses the boundary.
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    reply: Reply,
}

impl RecordingEngine {
    /// Records calls and replies with an empty buffer.
    pub fn new() -> Self { Self::replying(ResultBuffer::default()) }

    /// Records calls and replies with `buffer`.
    pub fn replying(buffer: impl Into<ResultBuffer>) -> Self {
        Self { calls: Mutex::new(Vec::new()), reply: Reply::Buffer(buffer.into()) }
    }

    /// Records calls and fails each with [`EngineError::Rejected`].
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self { calls: Mutex::new(Vec::new()), reply: Reply::Reject(message.into()) }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The most recent call.
    pub fn last_call(&self) -> Option<EngineCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }
}

impl Default for RecordingEngine {
    fn default() -> Self { Self::new() }
}

impl CompilerEngine for RecordingEngine {
    fn name(&self) -> &str { "recording" }

    fn dispatch(&self, call: EngineCall) -> Result<ResultBuffer> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
        match &self.reply {
            Reply::Buffer(buffer) => Ok(buffer.clone()),
            Reply::Reject(message) => Err(EngineError::Rejected(message.clone())),
        }
    }
}
