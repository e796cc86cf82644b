//! Building and running one engine tool invocation.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use engine::{EngineError, Result};
use tempfile::NamedTempFile;

/// A tool plus its arguments.
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    tool: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub(crate) fn new(tool: &Path) -> Self { Self { tool: tool.to_path_buf(), args: Vec::new() } }

    pub(crate) fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// `flag=value`, always present.
    pub(crate) fn assign(self, flag: &str, value: &str) -> Self {
        self.arg(format!("{}={}", flag, value))
    }

    /// `flag=value` when `value` is present; nothing when absent.
    pub(crate) fn assign_opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.assign(flag, v),
            None => self,
        }
    }

    /// `flag=true` / `flag=false`.
    pub(crate) fn boolean(self, flag: &str, value: bool) -> Self {
        self.assign(flag, if value { "true" } else { "false" })
    }

    /// Bare `flag` when `set`.
    pub(crate) fn switch(self, flag: &str, set: bool) -> Self {
        if set {
            self.arg(flag)
        } else {
            self
        }
    }

    pub(crate) fn tool_name(&self) -> String { self.tool.display().to_string() }

    #[cfg(test)]
    pub(crate) fn args(&self) -> &[OsString] { &self.args }

    /// Run to completion and return stdout.
    ///
    /// A non-zero exit becomes [`EngineError::Tool`] carrying the tool's
    /// stderr verbatim.
    pub(crate) fn run(self) -> Result<Vec<u8>> {
        let tool = self.tool_name();
        tracing::debug!(%tool, args = ?self.args, "running engine tool");

        let output = Command::new(&self.tool)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| EngineError::Spawn { tool: tool.clone(), source })?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        let status = output.status.code();
        logging::trace("command", &format!("{} exited unsuccessfully ({:?})", tool, status));
        Err(EngineError::Tool {
            tool,
            status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Write `contents` to a fresh temporary file the tools can read.
///
/// The file is removed when the returned handle drops.
pub(crate) fn stage(contents: &[u8], suffix: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().prefix("irbridge-").suffix(suffix).tempfile()?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(file)
}
