#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `irbridge-encoding` — Argument Marshalling Primitives
//!
//! Every textual argument that crosses into the compiler engine is UTF-8
//! bytes. This crate owns that conversion and the two list-joining rules the
//! engine's argument parser expects.
//!
//! ## Core Concepts
//!
//! ### `Text`
//! A borrowed host value that should become engine text: a `str`, raw bytes,
//! or an OS string / path. Only the last two can fail to transcode.
//!
//! ### `EncodedText`
//! Owned, already-validated UTF-8. An optional textual argument is an
//! `Option<EncodedText>`; `None` and an empty `EncodedText` are different
//! values and the engine treats them differently.
//!
//! ### List joining
//! Name lists are joined with `,` and shape-descriptor lists with `:`
//! (see [`ListSeparator`]).
//!
//! ## Example
//! ```
//! use encoding::{encode, join_names, join_shapes};
//!
//! let names = join_names(&["a", "b", "c"]);
//! assert_eq!(names, "a,b,c");
//! assert_eq!(join_shapes(&["1x2", "3x4"]), "1x2:3x4");
//!
//! let text = encode("pass_pipeline", "builtin.module(canonicalize)")?;
//! assert_eq!(text.as_bytes(), b"builtin.module(canonicalize)");
//! # Ok::<(), encoding::EncodingError>(())
//! ```

pub mod list;
pub mod text;

pub use list::*;
pub use text::*;
