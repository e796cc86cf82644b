use std::borrow::Cow;

use bytes::Bytes;

/// Opaque, immutable bytes returned by an engine entry point.
///
/// irbridge never interprets the contents. Depending on the entry point they
/// may be IR text, bytecode, or an empty buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResultBuffer(Bytes);

impl ResultBuffer {
    /// Wrap engine output.
    pub fn new(bytes: impl Into<Bytes>) -> Self { Self(bytes.into()) }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// Length in bytes.
    pub fn len(&self) -> usize { self.0.len() }

    /// True when the engine returned nothing.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Consume into the shared byte buffer.
    pub fn into_bytes(self) -> Bytes { self.0 }

    /// Lossy text view, for display and logging only.
    pub fn to_text_lossy(&self) -> Cow<'_, str> { String::from_utf8_lossy(&self.0) }
}

impl From<Vec<u8>> for ResultBuffer {
    fn from(value: Vec<u8>) -> Self { Self(Bytes::from(value)) }
}

impl From<Bytes> for ResultBuffer {
    fn from(value: Bytes) -> Self { Self(value) }
}

impl From<&'static [u8]> for ResultBuffer {
    fn from(value: &'static [u8]) -> Self { Self(Bytes::from_static(value)) }
}

impl From<&'static str> for ResultBuffer {
    fn from(value: &'static str) -> Self { Self(Bytes::from_static(value.as_bytes())) }
}

impl AsRef<[u8]> for ResultBuffer {
    fn as_ref(&self) -> &[u8] { &self.0 }
}
