// ABOUTME: Deployment orchestration.
// ABOUTME: Exports the pipeline, its phases, per-run state, and outcome types.

mod git;
mod outcome;
mod phase;
mod pipeline;
mod run;

pub use git::{AUTO_COMMIT_PREFIX, default_message};
pub use outcome::{Compensation, DeployReport, FailureClass, Outcome};
pub use phase::Phase;
pub use pipeline::Pipeline;
pub use run::DeploymentRun;
