// ABOUTME: Pipeline step declarations and their fixed execution order.
// ABOUTME: Steps are a closed enum; configuration only toggles and describes them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every step the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Build,
    VersionUpdate,
    GitCommit,
    Zip,
    Upload,
    Backup,
    Extract,
}

impl StepKind {
    /// Execution order. Independent of the order keys appear in the config file.
    pub const ORDER: [StepKind; 7] = [
        StepKind::Build,
        StepKind::VersionUpdate,
        StepKind::GitCommit,
        StepKind::Zip,
        StepKind::Upload,
        StepKind::Backup,
        StepKind::Extract,
    ];

    /// Key used for this step in the configuration file.
    pub fn key(&self) -> &'static str {
        match self {
            StepKind::Build => "build",
            StepKind::VersionUpdate => "versionUpdate",
            StepKind::GitCommit => "gitCommit",
            StepKind::Zip => "zip",
            StepKind::Upload => "upload",
            StepKind::Backup => "backup",
            StepKind::Extract => "extract",
        }
    }

    /// Description shown when the configuration does not provide one.
    pub fn default_description(&self) -> &'static str {
        match self {
            StepKind::Build => "Build project",
            StepKind::VersionUpdate => "Update package version",
            StepKind::GitCommit => "Commit local changes",
            StepKind::Zip => "Archive build output",
            StepKind::Upload => "Upload archive to staging directory",
            StepKind::Backup => "Back up live version",
            StepKind::Extract => "Switch to new version",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Declaration of one optional step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Commit message override (git commit step only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The configured command, ignoring blank values.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Step entries as written in the configuration file; absent entries inherit.
///
/// The version update step is configured separately through `versionUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<StepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<StepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<StepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<StepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<StepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<StepConfig>,
}

impl StepOverrides {
    fn entry(&self, kind: StepKind) -> Option<&StepConfig> {
        match kind {
            StepKind::Build => self.build.as_ref(),
            StepKind::GitCommit => self.git_commit.as_ref(),
            StepKind::Zip => self.zip.as_ref(),
            StepKind::Upload => self.upload.as_ref(),
            StepKind::Backup => self.backup.as_ref(),
            StepKind::Extract => self.extract.as_ref(),
            StepKind::VersionUpdate => None,
        }
    }
}

/// Fully resolved steps for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Steps {
    pub build: StepConfig,
    pub version_update: StepConfig,
    pub git_commit: StepConfig,
    pub zip: StepConfig,
    pub upload: StepConfig,
    pub backup: StepConfig,
    pub extract: StepConfig,
}

impl Steps {
    /// Resolve each step: project entry, then default entry, then the built-in
    /// fallback (disabled, except the switch step which is enabled).
    pub fn resolve(
        project: &StepOverrides,
        defaults: &StepOverrides,
        version_update: StepConfig,
    ) -> Self {
        let pick = |kind: StepKind| {
            project
                .entry(kind)
                .or_else(|| defaults.entry(kind))
                .cloned()
                .unwrap_or_else(|| match kind {
                    StepKind::Extract => StepConfig::enabled(),
                    _ => StepConfig::disabled(),
                })
        };

        Steps {
            build: pick(StepKind::Build),
            version_update,
            git_commit: pick(StepKind::GitCommit),
            zip: pick(StepKind::Zip),
            upload: pick(StepKind::Upload),
            backup: pick(StepKind::Backup),
            extract: pick(StepKind::Extract),
        }
    }

    pub fn get(&self, kind: StepKind) -> &StepConfig {
        match kind {
            StepKind::Build => &self.build,
            StepKind::VersionUpdate => &self.version_update,
            StepKind::GitCommit => &self.git_commit,
            StepKind::Zip => &self.zip,
            StepKind::Upload => &self.upload,
            StepKind::Backup => &self.backup,
            StepKind::Extract => &self.extract,
        }
    }

    pub fn get_mut(&mut self, kind: StepKind) -> &mut StepConfig {
        match kind {
            StepKind::Build => &mut self.build,
            StepKind::VersionUpdate => &mut self.version_update,
            StepKind::GitCommit => &mut self.git_commit,
            StepKind::Zip => &mut self.zip,
            StepKind::Upload => &mut self.upload,
            StepKind::Backup => &mut self.backup,
            StepKind::Extract => &mut self.extract,
        }
    }

    pub fn is_enabled(&self, kind: StepKind) -> bool {
        self.get(kind).enabled
    }

    /// Description for progress output.
    pub fn description(&self, kind: StepKind) -> &str {
        self.get(kind)
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| kind.default_description())
    }

    /// Enabled steps in execution order.
    pub fn enabled_in_order(&self) -> Vec<StepKind> {
        StepKind::ORDER
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}
