// ABOUTME: In-memory stand-in for the remote deployment host.
// ABOUTME: Records commands, keeps uploaded bytes, and fails commands on request.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use sunrise_deploy::exec::RemoteHost;
use sunrise_deploy::ssh::{self, CommandOutput};

#[derive(Default)]
struct HostState {
    commands: Vec<String>,
    echoed: Vec<bool>,
    uploads: BTreeMap<String, Vec<u8>>,
    live: Vec<String>,
}

/// Remote host whose behaviour is scripted per test.
///
/// A command fails when it contains one of the configured fragments. A
/// successful command containing `unzip` is treated as the switch: the files
/// of the staged archive it names become the live file list.
#[derive(Default)]
pub struct ScriptedHost {
    failing: Vec<String>,
    fail_uploads: bool,
    state: Mutex<HostState>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command containing `fragment`.
    pub fn fail_on(mut self, fragment: &str) -> Self {
        self.failing.push(fragment.to_string());
        self
    }

    pub fn fail_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    /// Every command executed, in order.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().commands.clone()
    }

    /// Whether each executed command asked for its output to be echoed.
    pub fn echoed(&self) -> Vec<bool> {
        self.state.lock().echoed.clone()
    }

    pub fn uploaded(&self, remote_path: &str) -> Option<Vec<u8>> {
        self.state.lock().uploads.get(remote_path).cloned()
    }

    /// Files in the live directory after the last successful switch.
    pub fn live_files(&self) -> Vec<String> {
        self.state.lock().live.clone()
    }
}

#[async_trait]
impl RemoteHost for ScriptedHost {
    fn name(&self) -> String {
        "deploy@test-host".to_string()
    }

    async fn exec(&self, command: &str, echo: bool) -> ssh::Result<CommandOutput> {
        let mut state = self.state.lock();
        state.commands.push(command.to_string());
        state.echoed.push(echo);

        if self.failing.iter().any(|f| command.contains(f.as_str())) {
            return Ok(CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("scripted failure: {command}"),
            });
        }

        if command.contains("unzip") {
            let staged = state
                .uploads
                .iter()
                .find(|(path, _)| command.contains(path.as_str()))
                .map(|(_, bytes)| bytes.clone());
            let Some(bytes) = staged else {
                return Ok(CommandOutput {
                    exit_code: 9,
                    stdout: String::new(),
                    stderr: "unzip: cannot find archive".to_string(),
                });
            };
            state.live = archive_files(&bytes);
        }

        Ok(CommandOutput::default())
    }

    async fn upload(&self, local: &Path, remote_path: &str) -> ssh::Result<u64> {
        if self.fail_uploads {
            return Err(ssh::Error::UploadFailed {
                remote: remote_path.to_string(),
                reason: "scripted failure".to_string(),
            });
        }

        let bytes = std::fs::read(local)?;
        let len = bytes.len() as u64;
        self.state
            .lock()
            .uploads
            .insert(remote_path.to_string(), bytes);
        Ok(len)
    }
}

fn archive_files(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut files: Vec<String> = archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .map(str::to_string)
        .collect();
    files.sort();
    files
}
