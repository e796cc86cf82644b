#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Simple logging utilities for irbridge.
//!
//! Library crates emit structured events through `tracing`; binaries call
//! [`init`] once to install a stderr subscriber. [`trace`] is the plain
//! stderr line used on failure paths.

use tracing_subscriber::EnvFilter;

/// Prints a trace message to stderr with module prefix.
pub fn trace(module: &str, msg: &str) {
    eprintln!("[TRACE][{}] {}", module, msg);
}

/// Pick the filter directive: `verbose` forces `debug`, then `RUST_LOG`,
/// then `level`.
pub fn filter_directive(env: Option<&str>, level: &str, verbose: bool) -> String {
    match env {
        _ if verbose => "debug".to_string(),
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ => level.to_string(),
    }
}

/// Install the global stderr subscriber.
///
/// Returns `false` if a subscriber was already installed or the directive
/// did not parse (in which case `info` is used).
pub fn init(level: &str, verbose: bool) -> bool {
    let env = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(env.as_deref(), level, verbose);
    let (filter, parsed) = match EnvFilter::try_new(&directive) {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new("info"), false),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(%directive, "logging initialized");
    }
    installed && parsed
}
