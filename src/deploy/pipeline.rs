// ABOUTME: The deployment state machine.
// ABOUTME: Walks the fixed step order, classifies failures, and reverts the version bump on abort.

use super::git;
use super::outcome::{Compensation, DeployReport, FailureClass, Outcome};
use super::phase::Phase;
use super::run::DeploymentRun;
use crate::config::{ProjectConfig, StepKind};
use crate::diagnostics::{Diagnostics, Warning};
use crate::exec::{CommandRunner, ExecOptions, RemoteHost};
use crate::output::{DeployEvent, EventSink};
use crate::template;
use crate::version::VersionFile;

/// What the state machine does after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Continue,
    Abort(FailureClass),
}

/// One deployment of one project.
///
/// The pipeline never returns an error: every step resolves to a success flag
/// and the classification into soft, hard and critical failures happens here.
/// Build runs before the version bump so a version is never advanced for code
/// that does not build. The live directory is only touched by the final switch
/// command.
pub struct Pipeline<'a, H: RemoteHost + ?Sized> {
    project: &'a ProjectConfig,
    runner: CommandRunner<'a, H>,
    version_file: VersionFile,
}

impl<'a, H: RemoteHost + ?Sized> Pipeline<'a, H> {
    pub fn new(project: &'a ProjectConfig, host: &'a H, events: &'a dyn EventSink) -> Self {
        Self {
            project,
            runner: CommandRunner::new(host, events),
            version_file: VersionFile::in_project(&project.local),
        }
    }

    fn events(&self) -> &'a dyn EventSink {
        self.runner.events()
    }

    /// Run every enabled step in order until one aborts or the switch completes.
    pub async fn run(&self) -> DeployReport {
        let mut run = DeploymentRun::new();
        let mut diagnostics = Diagnostics::default();

        tracing::info!(project = %self.project.name, "starting deployment");

        let problems = self.project.problems();
        if !problems.is_empty() {
            for problem in &problems {
                tracing::error!(project = %self.project.name, "{}", problem);
                self.events().warning(problem);
            }
            return self.fail(run, diagnostics, FailureClass::Configuration);
        }

        for kind in StepKind::ORDER {
            run.enter(Phase::from(kind));
            if !self.project.steps.is_enabled(kind) {
                tracing::debug!(step = kind.key(), "step disabled, skipping");
                continue;
            }

            let next = match kind {
                StepKind::Build => self.build().await,
                StepKind::VersionUpdate => self.update_version(&mut run, &mut diagnostics),
                StepKind::GitCommit => self.commit(&run, &mut diagnostics).await,
                StepKind::Zip => self.package().await,
                StepKind::Upload => self.upload().await,
                StepKind::Backup => self.backup(&mut diagnostics).await,
                StepKind::Extract => self.switch().await,
            };

            if let Next::Abort(class) = next {
                return self.fail(run, diagnostics, class);
            }
        }

        run.enter(Phase::Succeeded);
        let new_version = run.new_version().copied();
        match &new_version {
            Some(version) => self
                .events()
                .notice(&format!("{} deployed at version {}", self.project.name, version)),
            None => self
                .events()
                .notice(&format!("{} deployed", self.project.name)),
        }
        tracing::info!(project = %self.project.name, "deployment succeeded");

        DeployReport {
            outcome: Outcome::Succeeded { new_version },
            warnings: diagnostics.into_warnings(),
            run,
        }
    }

    async fn build(&self) -> Next {
        let options = ExecOptions::in_dir(&self.project.local);
        let ok = self
            .runner
            .local(
                &self.project.build_command,
                self.project.steps.description(StepKind::Build),
                &options,
            )
            .await;
        hard_unless(ok)
    }

    fn update_version(&self, run: &mut DeploymentRun, diagnostics: &mut Diagnostics) -> Next {
        let description = self.project.steps.description(StepKind::VersionUpdate);
        let bump = self.project.version_update.bump;
        self.events().emit(DeployEvent::StepStarted {
            description: description.to_string(),
            command: Some(format!("bump {} in {}", bump, self.version_file.path().display())),
        });

        // The original is captured before the bump writes anything.
        let bumped = self.version_file.read().and_then(|current| {
            run.capture_original(current);
            self.version_file.try_bump(bump)
        });

        let ok = match bumped {
            Ok((old, new)) => {
                run.record_bump(new);
                self.events().notice(&format!("version {} -> {}", old, new));
                true
            }
            Err(e) => {
                self.soft_fail(
                    diagnostics,
                    Warning::version_skipped(format!("version not updated: {}", e)),
                );
                false
            }
        };

        self.events().emit(DeployEvent::StepFinished {
            description: description.to_string(),
            success: ok,
        });
        Next::Continue
    }

    async fn commit(&self, run: &DeploymentRun, diagnostics: &mut Diagnostics) -> Next {
        let step = self.project.steps.get(StepKind::GitCommit);
        let description = self.project.steps.description(StepKind::GitCommit);
        let message = step
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| git::default_message(&run.version_label()));

        self.events().emit(DeployEvent::StepStarted {
            description: description.to_string(),
            command: None,
        });
        let ok = git::commit_all(&self.runner, &self.project.local, &message).await;
        if !ok {
            self.soft_fail(
                diagnostics,
                Warning::commit_failed("local changes were not committed"),
            );
        }
        self.events().emit(DeployEvent::StepFinished {
            description: description.to_string(),
            success: ok,
        });
        Next::Continue
    }

    async fn package(&self) -> Next {
        let ok = self
            .runner
            .archive(
                &self.project.dist_dir(),
                &self.project.archive_path(),
                self.project.steps.description(StepKind::Zip),
            )
            .await;
        hard_unless(ok)
    }

    async fn upload(&self) -> Next {
        let staged = self
            .runner
            .remote(
                &self.project.ensure_temp_command(),
                "Prepare staging directory",
                &ExecOptions::silent(),
            )
            .await;
        if !staged {
            return Next::Abort(FailureClass::Hard);
        }

        let ok = self
            .runner
            .upload(
                &self.project.archive_path(),
                &self.project.remote_archive_path(),
                self.project.steps.description(StepKind::Upload),
            )
            .await;
        hard_unless(ok)
    }

    async fn backup(&self, diagnostics: &mut Diagnostics) -> Next {
        let Some(command) = self.project.steps.get(StepKind::Backup).command() else {
            self.soft_fail(
                diagnostics,
                Warning::backup_failed("no backup command configured, live version not backed up"),
            );
            return Next::Continue;
        };

        let command = template::expand(command, self.project);
        let ok = self
            .runner
            .remote(
                &command,
                self.project.steps.description(StepKind::Backup),
                &ExecOptions::silent(),
            )
            .await;
        if !ok {
            self.soft_fail(
                diagnostics,
                Warning::backup_failed("backup failed, continuing with the staged version"),
            );
        }
        Next::Continue
    }

    async fn switch(&self) -> Next {
        let ok = self
            .runner
            .remote(
                &self.project.switch_command(),
                self.project.steps.description(StepKind::Extract),
                &ExecOptions::silent(),
            )
            .await;
        if ok {
            Next::Continue
        } else {
            Next::Abort(FailureClass::CriticalSwitch)
        }
    }

    fn soft_fail(&self, diagnostics: &mut Diagnostics, warning: Warning) {
        self.events().warning(&warning.message);
        diagnostics.warn(warning);
    }

    fn fail(&self, mut run: DeploymentRun, diagnostics: Diagnostics, class: FailureClass) -> DeployReport {
        let phase = run.phase();
        tracing::error!(project = %self.project.name, %phase, "deployment failed: {}", class);

        let compensation = self.compensate(&run);
        let outcome = Outcome::Failed {
            phase,
            class,
            compensation,
        };
        run.enter(outcome.terminal_phase());

        DeployReport {
            outcome,
            warnings: diagnostics.into_warnings(),
            run,
        }
    }

    /// Restore the captured version if this run bumped it. Remote state is
    /// never compensated.
    fn compensate(&self, run: &DeploymentRun) -> Compensation {
        let Some(original) = run.compensation_target().copied() else {
            return Compensation::NotNeeded;
        };

        let description = "Revert version";
        self.events().emit(DeployEvent::StepStarted {
            description: description.to_string(),
            command: Some(format!("restore {} in {}", original, self.version_file.path().display())),
        });
        let reverted = self.version_file.revert(&original);
        self.events().emit(DeployEvent::StepFinished {
            description: description.to_string(),
            success: reverted,
        });

        if reverted {
            tracing::info!("version restored to {}", original);
            Compensation::Reverted(original)
        } else {
            tracing::error!("could not restore version {}", original);
            Compensation::RevertFailed(original)
        }
    }
}

fn hard_unless(ok: bool) -> Next {
    if ok {
        Next::Continue
    } else {
        Next::Abort(FailureClass::Hard)
    }
}
