// ABOUTME: Commit local changes before a deployment.
// ABOUTME: Skips quietly outside a git work tree or when nothing changed.

use std::path::Path;

use crate::exec::{CommandRunner, ExecOptions, RemoteHost, run_local};
use crate::shell;

/// Prefix of the generated commit message.
pub const AUTO_COMMIT_PREFIX: &str = "chore: auto commit before deploy - v";

pub fn default_message(version_label: &str) -> String {
    format!("{AUTO_COMMIT_PREFIX}{version_label}")
}

/// Stage and commit everything in `dir`. Returns false only when staging or
/// committing itself failed.
pub(super) async fn commit_all<H: RemoteHost + ?Sized>(
    runner: &CommandRunner<'_, H>,
    dir: &Path,
    message: &str,
) -> bool {
    let quiet_check = ExecOptions::in_dir(dir).with_silent(true);

    if !succeeds("git rev-parse --is-inside-work-tree", &quiet_check).await {
        runner
            .events()
            .notice(&format!("{} is not a git repository, skipping commit", dir.display()));
        return true;
    }

    if succeeds("git diff --quiet && git diff --cached --quiet", &quiet_check).await {
        runner.events().notice("no changes to commit");
        return true;
    }

    let options = ExecOptions::in_dir(dir);
    runner.local("git add .", "Stage changes", &options).await
        && runner
            .local(
                &format!("git commit -m {}", shell::quote(message)),
                "Commit changes",
                &options,
            )
            .await
}

async fn succeeds(command: &str, options: &ExecOptions) -> bool {
    match run_local(command, options).await {
        Ok(output) => output.success(),
        Err(e) => {
            tracing::debug!("'{}' could not run: {}", command, e);
            false
        }
    }
}
