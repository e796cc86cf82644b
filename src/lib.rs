// SPDX-License-Identifier: MIT OR Apache-2.0

//! irbridge umbrella crate.
//!
//! This crate primarily serves as the workspace root.
//!
//! The facade lives in `adapters` (`irbridge-facade`), the engine boundary
//! and call records in `primitives/engine`, text transcoding in
//! `primitives/encoding`, the execution context in `primitives/context`,
//! the subprocess backend in `backends/command`, and the `irbridge` binary
//! in `cli/orchestrator`.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(deprecated_in_future)]
#![doc(test(attr(warn(unused))))]

/// Miscellaneous metadata about the irbridge workspace.
pub mod irbridge_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
