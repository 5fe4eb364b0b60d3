// ABOUTME: File upload over an SSH session channel.
// ABOUTME: Streams a local file into `cat > <path>` on the remote host.

use std::path::Path;

use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::io::AsyncReadExt;

use super::error::{Error, Result};
use crate::shell;

const CHUNK_SIZE: usize = 64 * 1024;

/// Send `local` through `channel` into `remote_path`, returning the bytes sent.
pub(super) async fn send_file(
    mut channel: Channel<Msg>,
    local: &Path,
    remote_path: &str,
) -> Result<u64> {
    let failed = |reason: String| Error::UploadFailed {
        remote: remote_path.to_string(),
        reason,
    };

    let mut file = tokio::fs::File::open(local).await?;

    let command = format!("cat > {}", shell::quote(remote_path));
    channel
        .exec(true, command.as_str())
        .await
        .map_err(|e| failed(format!("failed to start remote writer: {}", e)))?;

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut sent = 0u64;
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        channel
            .data(&buf[..n])
            .await
            .map_err(|e| failed(format!("channel write failed: {}", e)))?;
        sent += n as u64;
    }
    channel
        .eof()
        .await
        .map_err(|e| failed(format!("failed to close stream: {}", e)))?;

    let mut stderr = Vec::new();
    let mut exit_code = None;
    loop {
        match channel.wait().await {
            Some(ChannelMsg::ExtendedData { data, ext: 1 }) => stderr.extend_from_slice(&data),
            Some(ChannelMsg::ExitStatus { exit_status }) => exit_code = Some(exit_status),
            Some(ChannelMsg::Eof) if exit_code.is_some() => break,
            Some(ChannelMsg::Close) | None => break,
            Some(_) => {}
        }
    }

    match exit_code {
        Some(0) => {
            tracing::debug!(bytes = sent, "uploaded {} to {}", local.display(), remote_path);
            Ok(sent)
        }
        Some(code) => Err(failed(format!(
            "remote writer exited with {}: {}",
            code,
            String::from_utf8_lossy(&stderr).trim()
        ))),
        None => Err(Error::ChannelClosed),
    }
}
