// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects soft step failures that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The version could not be read or bumped; the run continues unversioned.
    pub fn version_skipped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::VersionSkipped,
            message: message.into(),
        }
    }

    /// Committing local changes failed.
    pub fn commit_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CommitFailed,
            message: message.into(),
        }
    }

    /// Backing up the live version failed.
    pub fn backup_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::BackupFailed,
            message: message.into(),
        }
    }

    /// Create an SSH disconnect warning.
    pub fn ssh_disconnect(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SshDisconnect,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    VersionSkipped,
    CommitFailed,
    BackupFailed,
    /// Failed to cleanly disconnect SSH session.
    SshDisconnect,
}
