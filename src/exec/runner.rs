// ABOUTME: Reporting wrapper around local and remote command execution.
// ABOUTME: Every call emits start/finish events and resolves to a plain success flag.

use std::path::Path;

use super::host::RemoteHost;
use super::local::{ExecOptions, run_local};
use crate::archive;
use crate::output::{DeployEvent, EventSink};

/// Runs step commands and reports them to an [`EventSink`].
///
/// None of these methods return errors: spawn failures, transport failures
/// and nonzero exits all come back as `false`, with the cause logged and
/// emitted as a warning.
///
/// Command output reaches the terminal only for non-silent commands and only
/// when the sink passes output through. Otherwise it is captured, and the
/// stderr of a failed command is surfaced as a warning.
pub struct CommandRunner<'a, H: RemoteHost + ?Sized> {
    host: &'a H,
    events: &'a dyn EventSink,
}

impl<'a, H: RemoteHost + ?Sized> CommandRunner<'a, H> {
    pub fn new(host: &'a H, events: &'a dyn EventSink) -> Self {
        Self { host, events }
    }

    pub fn events(&self) -> &'a dyn EventSink {
        self.events
    }

    /// Run a shell command on this machine.
    pub async fn local(&self, command: &str, description: &str, options: &ExecOptions) -> bool {
        self.started(description, (!options.silent).then(|| command.to_string()));

        let capture = self.captures(options);
        let options = options.clone().with_silent(capture);
        let success = match run_local(command, &options).await {
            Ok(output) if output.success() => true,
            Ok(output) => {
                tracing::warn!(
                    code = ?output.code,
                    "local command failed: {}",
                    command
                );
                if capture {
                    self.surface_stderr(&output.stderr);
                }
                false
            }
            Err(e) => {
                tracing::error!("failed to spawn '{}': {}", command, e);
                self.events
                    .warning(&format!("could not run {}: {}", description, e));
                false
            }
        };

        self.finished(description, success)
    }

    /// Run a shell command on the remote host.
    pub async fn remote(&self, command: &str, description: &str, options: &ExecOptions) -> bool {
        let shown = (!options.silent).then(|| format!("[{}] {}", self.host.name(), command));
        self.started(description, shown);

        let capture = self.captures(options);
        let success = match self.host.exec(command, !capture).await {
            Ok(output) if output.success() => true,
            Ok(output) => {
                tracing::warn!(
                    code = output.exit_code,
                    "remote command failed: {}",
                    command
                );
                if capture {
                    self.surface_stderr(&output.stderr);
                }
                false
            }
            Err(e) => {
                tracing::error!("remote execution of '{}' failed: {}", command, e);
                self.events
                    .warning(&format!("could not run {}: {}", description, e));
                false
            }
        };

        self.finished(description, success)
    }

    /// Copy a local file to the remote host.
    pub async fn upload(&self, local: &Path, remote_path: &str, description: &str) -> bool {
        self.started(
            description,
            Some(format!(
                "copy {} -> {}:{}",
                local.display(),
                self.host.name(),
                remote_path
            )),
        );

        let success = match self.host.upload(local, remote_path).await {
            Ok(bytes) => {
                self.events.notice(&format!("sent {} bytes", bytes));
                true
            }
            Err(e) => {
                tracing::error!("upload of {} failed: {}", local.display(), e);
                self.events.warning(&format!("upload failed: {}", e));
                false
            }
        };

        self.finished(description, success)
    }

    /// Compress a local directory into an archive file.
    pub async fn archive(&self, source: &Path, out: &Path, description: &str) -> bool {
        self.started(
            description,
            Some(format!("zip {} -> {}", source.display(), out.display())),
        );

        let success = match archive::zip_directory(source, out).await {
            Ok(summary) => {
                self.events.notice(&format!(
                    "{} files, {} bytes",
                    summary.files, summary.bytes
                ));
                true
            }
            Err(e) => {
                tracing::error!("archiving {} failed: {}", source.display(), e);
                self.events.warning(&format!("archive failed: {}", e));
                false
            }
        };

        self.finished(description, success)
    }

    fn captures(&self, options: &ExecOptions) -> bool {
        options.silent || !self.events.passes_through_output()
    }

    fn started(&self, description: &str, command: Option<String>) {
        self.events.emit(DeployEvent::StepStarted {
            description: description.to_string(),
            command,
        });
    }

    fn finished(&self, description: &str, success: bool) -> bool {
        self.events.emit(DeployEvent::StepFinished {
            description: description.to_string(),
            success,
        });
        success
    }

    fn surface_stderr(&self, stderr: &str) {
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            tracing::warn!(stderr, "captured output of failed command");
            self.events.warning(stderr);
        }
    }
}
