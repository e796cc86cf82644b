//! UTF-8 transcoding of textual arguments.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for encoding operations.
pub type Result<T> = std::result::Result<T, EncodingError>;

/// A textual argument could not be represented as UTF-8.
///
/// Raised before any engine call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("argument `{param}` is not valid UTF-8 (valid up to byte {valid_up_to})")]
pub struct EncodingError {
    /// Name of the offending parameter.
    pub param: &'static str,
    /// Length of the longest valid UTF-8 prefix.
    pub valid_up_to: usize,
}

/// A host value on its way to becoming engine text.
#[derive(Debug, Clone, Copy)]
pub enum Text<'a> {
    /// Already valid Unicode text.
    Str(&'a str),
    /// Raw bytes, e.g. file contents read from disk.
    Bytes(&'a [u8]),
    /// Platform string, e.g. a filesystem path.
    Os(&'a OsStr),
}

impl<'a> From<&'a str> for Text<'a> {
    fn from(value: &'a str) -> Self { Text::Str(value) }
}

impl<'a> From<&'a String> for Text<'a> {
    fn from(value: &'a String) -> Self { Text::Str(value.as_str()) }
}

impl<'a> From<&'a [u8]> for Text<'a> {
    fn from(value: &'a [u8]) -> Self { Text::Bytes(value) }
}

impl<'a> From<&'a Vec<u8>> for Text<'a> {
    fn from(value: &'a Vec<u8>) -> Self { Text::Bytes(value.as_slice()) }
}

impl<'a> From<&'a OsStr> for Text<'a> {
    fn from(value: &'a OsStr) -> Self { Text::Os(value) }
}

impl<'a> From<&'a Path> for Text<'a> {
    fn from(value: &'a Path) -> Self { Text::Os(value.as_os_str()) }
}

impl<'a> From<&'a PathBuf> for Text<'a> {
    fn from(value: &'a PathBuf) -> Self { Text::Os(value.as_os_str()) }
}

/// Owned UTF-8 text ready to cross the engine boundary.
///
/// Can only be built through [`encode`] and friends (or deserialized from a
/// JSON string, which is UTF-8 by construction).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedText(String);

impl EncodedText {
    /// The UTF-8 bytes forwarded to the engine.
    pub fn as_bytes(&self) -> &[u8] { self.0.as_bytes() }

    /// The same bytes viewed as `str`.
    pub fn as_str(&self) -> &str { &self.0 }

    /// Number of encoded bytes.
    pub fn len(&self) -> usize { self.0.len() }

    /// True for the empty string. Note that empty is *not* the same as absent.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Consume into the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> { self.0.into_bytes() }
}

impl AsRef<str> for EncodedText {
    fn as_ref(&self) -> &str { &self.0 }
}

impl AsRef<OsStr> for EncodedText {
    fn as_ref(&self) -> &OsStr { OsStr::new(&self.0) }
}

impl fmt::Display for EncodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Transcode a textual argument to UTF-8.
///
/// `param` names the argument in the error should transcoding fail.
pub fn encode<'a>(param: &'static str, value: impl Into<Text<'a>>) -> Result<EncodedText> {
    match value.into() {
        Text::Str(s) => Ok(EncodedText(s.to_owned())),
        Text::Bytes(bytes) => encode_bytes(param, bytes),
        Text::Os(os) => encode_os_str(param, os),
    }
}

/// Transcode an optional textual argument, keeping `None` as `None`.
pub fn encode_optional(param: &'static str, value: Option<Text<'_>>) -> Result<Option<EncodedText>> {
    value.map(|v| encode(param, v)).transpose()
}

/// Validate raw bytes as UTF-8.
pub fn encode_bytes(param: &'static str, bytes: &[u8]) -> Result<EncodedText> {
    std::str::from_utf8(bytes)
        .map(|s| EncodedText(s.to_owned()))
        .map_err(|e| EncodingError { param, valid_up_to: e.valid_up_to() })
}

/// Validate a platform string as UTF-8.
pub fn encode_os_str(param: &'static str, value: &OsStr) -> Result<EncodedText> {
    encode_bytes(param, value.as_encoded_bytes())
}
