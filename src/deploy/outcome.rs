// ABOUTME: How a deployment run ended.
// ABOUTME: Failure classes with remediation hints, compensation results, and the final report.

use std::fmt;

use super::phase::Phase;
use super::run::DeploymentRun;
use crate::diagnostics::Warning;
use crate::version::Version;

/// Severity of a fatal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// A required step before the switch failed; the live site is untouched.
    Hard,
    /// The remote switch failed; the live directory may be half-replaced.
    CriticalSwitch,
    /// The project configuration cannot be deployed; nothing was touched.
    Configuration,
}

impl FailureClass {
    /// One-line advice printed after the failure.
    pub fn hint(&self) -> &'static str {
        match self {
            FailureClass::Hard => {
                "The live site was not changed. Fix the failing step and deploy again."
            }
            FailureClass::CriticalSwitch => {
                "The remote switch failed. Manual intervention is required: check the live \
                 directory and restore dist.backup if needed."
            }
            FailureClass::Configuration => {
                "Check the project entry in the deploy configuration file."
            }
        }
    }

    /// Only step failures signal through the exit status. A configuration
    /// failure is reported on stderr with its hint and exits 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            FailureClass::Hard => 1,
            FailureClass::CriticalSwitch => 2,
            FailureClass::Configuration => 0,
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::Hard => f.write_str("step failure"),
            FailureClass::CriticalSwitch => f.write_str("critical switch failure"),
            FailureClass::Configuration => f.write_str("configuration failure"),
        }
    }
}

/// What happened to the local version bump after a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// No bump was applied.
    NotNeeded,
    /// The version file was restored to this version.
    Reverted(Version),
    /// Restoring this version failed; the file still holds the bumped one.
    RevertFailed(Version),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded {
        new_version: Option<Version>,
    },
    Failed {
        phase: Phase,
        class: FailureClass,
        compensation: Compensation,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Succeeded { .. } => 0,
            Outcome::Failed { class, .. } => class.exit_code(),
        }
    }

    /// The terminal phase this outcome corresponds to.
    pub fn terminal_phase(&self) -> Phase {
        match self {
            Outcome::Succeeded { .. } => Phase::Succeeded,
            Outcome::Failed {
                compensation: Compensation::Reverted(_),
                ..
            } => Phase::RolledBack,
            Outcome::Failed { .. } => Phase::Failed,
        }
    }

    pub fn failure_class(&self) -> Option<FailureClass> {
        match self {
            Outcome::Succeeded { .. } => None,
            Outcome::Failed { class, .. } => Some(*class),
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub outcome: Outcome,
    /// Soft failures collected along the way.
    pub warnings: Vec<Warning>,
    pub run: DeploymentRun,
}

impl DeployReport {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_class() {
        assert_eq!(FailureClass::Hard.exit_code(), 1);
        assert_eq!(FailureClass::Configuration.exit_code(), 0);
        assert_eq!(FailureClass::CriticalSwitch.exit_code(), 2);
        assert_eq!(Outcome::Succeeded { new_version: None }.exit_code(), 0);
    }

    #[test]
    fn critical_hint_asks_for_manual_intervention() {
        assert!(FailureClass::CriticalSwitch.hint().contains("Manual intervention"));
    }

    #[test]
    fn reverted_failure_is_rolled_back() {
        let outcome = Outcome::Failed {
            phase: Phase::Upload,
            class: FailureClass::Hard,
            compensation: Compensation::Reverted(Version::new(1, 0, 0)),
        };
        assert_eq!(outcome.terminal_phase(), Phase::RolledBack);

        let outcome = Outcome::Failed {
            phase: Phase::Build,
            class: FailureClass::Hard,
            compensation: Compensation::NotNeeded,
        };
        assert_eq!(outcome.terminal_phase(), Phase::Failed);
        assert_eq!(outcome.failure_class(), Some(FailureClass::Hard));
    }
}
