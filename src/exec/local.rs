// ABOUTME: Local shell command execution.
// ABOUTME: Runs `sh -c` with inherited or captured stdio and an optional working directory.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

/// How a command should be run.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Capture output instead of passing it through to the terminal.
    pub silent: bool,
    /// Working directory for local commands.
    pub cwd: Option<PathBuf>,
}

impl ExecOptions {
    pub fn silent() -> Self {
        Self {
            silent: true,
            cwd: None,
        }
    }

    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            silent: false,
            cwd: Some(cwd.into()),
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

/// Result of a finished local command.
#[derive(Debug, Clone)]
pub struct LocalOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout (empty unless silent).
    pub stdout: String,
    /// Captured stderr (empty unless silent).
    pub stderr: String,
}

impl LocalOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `command` through `sh -c` and wait for it to exit.
pub async fn run_local(command: &str, options: &ExecOptions) -> std::io::Result<LocalOutput> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).stdin(Stdio::null());
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    if options.silent {
        let output = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).output().await?;
        Ok(LocalOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    } else {
        let status = cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit()).status().await?;
        Ok(LocalOutput {
            code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
