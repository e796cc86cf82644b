//! Offline engine: describes the call instead of making it.

use engine::{CompilerEngine, EngineCall, Result, ResultBuffer};

/// Engine that returns the marshalled call as pretty-printed JSON.
///
/// Useful for inspecting exactly what would cross the engine boundary,
/// including the absent-versus-empty distinction (`null` vs `""`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunEngine;

impl CompilerEngine for DryRunEngine {
    fn name(&self) -> &str { "dry-run" }

    fn dispatch(&self, call: EngineCall) -> Result<ResultBuffer> {
        tracing::debug!(entry_point = call.entry_point(), "dry run");
        let mut json = serde_json::to_vec_pretty(&call)?;
        json.push(b'\n');
        Ok(json.into())
    }
}
