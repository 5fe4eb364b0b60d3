// ABOUTME: Per-invocation deployment state.
// ABOUTME: Tracks the phase, the captured original version, and whether a bump was applied.

use chrono::{DateTime, Local};

use super::phase::Phase;
use crate::version::Version;

/// State of one pipeline run. Lives for a single invocation and is never persisted.
#[derive(Debug, Clone)]
pub struct DeploymentRun {
    phase: Phase,
    original_version: Option<Version>,
    new_version: Option<Version>,
    bump_applied: bool,
    started_at: DateTime<Local>,
}

impl Default for DeploymentRun {
    fn default() -> Self {
        Self::new()
    }
}

impl DeploymentRun {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            original_version: None,
            new_version: None,
            bump_applied: false,
            started_at: Local::now(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn original_version(&self) -> Option<&Version> {
        self.original_version.as_ref()
    }

    pub fn new_version(&self) -> Option<&Version> {
        self.new_version.as_ref()
    }

    pub fn bump_applied(&self) -> bool {
        self.bump_applied
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        tracing::debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    /// Record the version read before any mutation. Only the first capture counts.
    pub(crate) fn capture_original(&mut self, version: Version) {
        if self.original_version.is_none() {
            self.original_version = Some(version);
        }
    }

    pub(crate) fn record_bump(&mut self, version: Version) {
        self.new_version = Some(version);
        self.bump_applied = true;
    }

    /// The version to restore on failure: set only when a bump was written and
    /// the original was captured.
    pub fn compensation_target(&self) -> Option<&Version> {
        if self.bump_applied {
            self.original_version.as_ref()
        } else {
            None
        }
    }

    /// Label for the commit message: new version, else original, else the start time.
    pub fn version_label(&self) -> String {
        self.new_version
            .or(self.original_version)
            .map(|v| v.to_string())
            .unwrap_or_else(|| self.started_at.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}
