// ABOUTME: Command execution on the local machine and the remote host.
// ABOUTME: Exposes the RemoteHost transport seam and the reporting CommandRunner.

mod host;
mod local;
mod runner;

pub use host::RemoteHost;
pub use local::{ExecOptions, LocalOutput, run_local};
pub use runner::CommandRunner;
