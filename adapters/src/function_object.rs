//! In-process function objects accepted by function import.

/// A function that can serialize itself to its textual definition.
///
/// Serialization happens on demand, after the execution context is up.
pub trait FunctionObject {
    /// The function's textual definition.
    fn function_def(&self) -> String;
}

/// A function whose definition is already text, e.g. read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFunction {
    definition: String,
}

impl TextFunction {
    /// Wrap an existing textual definition.
    pub fn new(definition: impl Into<String>) -> Self { Self { definition: definition.into() } }
}

impl FunctionObject for TextFunction {
    fn function_def(&self) -> String { self.definition.clone() }
}

impl FunctionObject for String {
    fn function_def(&self) -> String { self.clone() }
}
