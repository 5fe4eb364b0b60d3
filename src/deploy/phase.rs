// ABOUTME: Pipeline phases, from Idle through the terminal states.
// ABOUTME: Each configurable step maps onto exactly one phase.

use std::fmt;

use crate::config::StepKind;

/// Where a deployment run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Build,
    Version,
    Commit,
    Package,
    Upload,
    Backup,
    Switch,
    Succeeded,
    Failed,
    RolledBack,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed | Phase::RolledBack)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Build => "build",
            Phase::Version => "version",
            Phase::Commit => "commit",
            Phase::Package => "package",
            Phase::Upload => "upload",
            Phase::Backup => "backup",
            Phase::Switch => "switch",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
            Phase::RolledBack => "rolled-back",
        }
    }
}

impl From<StepKind> for Phase {
    fn from(kind: StepKind) -> Self {
        match kind {
            StepKind::Build => Phase::Build,
            StepKind::VersionUpdate => Phase::Version,
            StepKind::GitCommit => Phase::Commit,
            StepKind::Zip => Phase::Package,
            StepKind::Upload => Phase::Upload,
            StepKind::Backup => Phase::Backup,
            StepKind::Extract => Phase::Switch,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
