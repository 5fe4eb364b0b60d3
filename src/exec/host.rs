// ABOUTME: Transport trait for the deployment target.
// ABOUTME: Implemented by the SSH session and its lazy wrapper; tests substitute scripted hosts.

use std::path::Path;

use async_trait::async_trait;

use crate::ssh::{self, CommandOutput, LazySession, Session};

/// A remote machine that can run shell commands and receive files.
#[async_trait]
pub trait RemoteHost: Send + Sync {
    /// Short name for progress output, e.g. `deploy@web1`.
    fn name(&self) -> String;

    /// Run `command` through the remote shell. With `echo`, output is shown
    /// locally as it arrives; it is captured either way.
    async fn exec(&self, command: &str, echo: bool) -> ssh::Result<CommandOutput>;

    /// Copy `local` to `remote_path`, returning the number of bytes sent.
    async fn upload(&self, local: &Path, remote_path: &str) -> ssh::Result<u64>;
}

#[async_trait]
impl RemoteHost for Session {
    fn name(&self) -> String {
        self.config().target()
    }

    async fn exec(&self, command: &str, echo: bool) -> ssh::Result<CommandOutput> {
        if echo {
            self.exec_echo(command).await
        } else {
            Session::exec(self, command).await
        }
    }

    async fn upload(&self, local: &Path, remote_path: &str) -> ssh::Result<u64> {
        Session::upload(self, local, remote_path).await
    }
}

#[async_trait]
impl RemoteHost for LazySession {
    fn name(&self) -> String {
        self.config().target()
    }

    async fn exec(&self, command: &str, echo: bool) -> ssh::Result<CommandOutput> {
        RemoteHost::exec(self.session().await?, command, echo).await
    }

    async fn upload(&self, local: &Path, remote_path: &str) -> ssh::Result<u64> {
        Session::upload(self.session().await?, local, remote_path).await
    }
}
