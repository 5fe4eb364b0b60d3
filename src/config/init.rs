// ABOUTME: Default configuration scaffolding.
// ABOUTME: Builds the starter deploy.config.json written on first use or by `init`.

use std::path::Path;

use crate::error::{Error, Result};

use super::{ConfigStore, DeployConfig, Defaults, StepConfig, StepOverrides, VersionUpdate};

/// Backup template used by the default configuration.
pub const DEFAULT_BACKUP_COMMAND: &str = "cd $REMOTE && cp -r dist dist.backup || true";

/// The starter configuration: build, archive, upload, and back up, with no projects.
pub fn default_config() -> DeployConfig {
    DeployConfig {
        default: Defaults {
            version_update: VersionUpdate::default(),
            steps: StepOverrides {
                build: Some(StepConfig::enabled().with_description("Build project")),
                zip: Some(StepConfig::enabled().with_description("Archive build output")),
                upload: Some(StepConfig::enabled().with_description("Upload archive to server")),
                backup: Some(
                    StepConfig::enabled()
                        .with_command(DEFAULT_BACKUP_COMMAND)
                        .with_description("Back up live version"),
                ),
                git_commit: Some(StepConfig::disabled()),
                extract: None,
            },
            ..Defaults::default()
        },
        projects: Default::default(),
    }
}

/// Write the default configuration to `path`.
pub fn init_config(path: &Path, force: bool) -> Result<ConfigStore> {
    if path.exists() && !force {
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    ConfigStore::open(path)
}
