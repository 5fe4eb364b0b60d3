// ABOUTME: Deploy command implementation.
// ABOUTME: Selects and confirms a project, runs the pipeline over a lazy SSH session, and reports.

use dialoguer::{Confirm, Select};
use sunrise_deploy::config::{ConfigStore, ProjectConfig, Selection};
use sunrise_deploy::deploy::{Compensation, DeployReport, FailureClass, Outcome, Pipeline};
use sunrise_deploy::diagnostics::{Diagnostics, Warning};
use sunrise_deploy::error::{Error, Result};
use sunrise_deploy::output::Output;
use sunrise_deploy::ssh::LazySession;

/// Deploy one project and return the process exit code.
pub async fn deploy(
    store: &ConfigStore,
    requested: Option<&str>,
    yes: bool,
    output: &mut Output,
) -> Result<i32> {
    let name = match store.select_project(requested)? {
        Selection::Project(name) => name,
        Selection::Choose(names) => choose_project(&names)?,
    };
    let project = store.resolve(&name)?;

    print_summary(&project, output);

    let problems = project.problems();
    if !problems.is_empty() {
        for problem in &problems {
            output.error(problem);
        }
        output.hint(FailureClass::Configuration.hint());
        return Ok(FailureClass::Configuration.exit_code());
    }

    if !yes
        && !Confirm::new()
            .with_prompt(format!("Deploy {}?", project.name))
            .default(true)
            .interact()?
    {
        output.progress("Deployment cancelled.");
        return Ok(0);
    }

    output.start_timer();
    let mut diag = Diagnostics::default();

    let server = project
        .server_config()
        .map_err(|e| Error::InvalidConfig(format!("server: {}", e)))?;
    // Connects on the first remote step; a connect failure fails that step.
    let session = LazySession::new(
        server.ssh_session_config(project.identity_file.as_deref(), project.trust_first_connection),
    );

    let report = Pipeline::new(&project, &session, &*output).run().await;

    if let Err(e) = session.disconnect().await {
        diag.warn(Warning::ssh_disconnect(format!(
            "SSH disconnect failed for {}: {}",
            server.host, e
        )));
    }

    report_outcome(&project, &report, diag, output);
    Ok(report.exit_code())
}

fn choose_project(names: &[String]) -> Result<String> {
    let index = Select::new()
        .with_prompt("Which project do you want to deploy?")
        .items(names)
        .default(0)
        .interact()?;
    Ok(names[index].clone())
}

fn print_summary(project: &ProjectConfig, output: &Output) {
    output.progress(&format!("Project: {}", project.name));
    output.progress(&format!("  server: {}", project.server));
    output.progress(&format!("  remote: {}", project.remote));
    output.progress(&format!("  local:  {}", project.local.display()));
    let steps: Vec<&str> = project
        .steps
        .enabled_in_order()
        .into_iter()
        .map(|kind| kind.key())
        .collect();
    output.progress(&format!("  steps:  {}", steps.join(", ")));
}

fn report_outcome(project: &ProjectConfig, report: &DeployReport, diag: Diagnostics, output: &Output) {
    for warning in report.warnings.iter().chain(diag.warnings()) {
        output.warn(&warning.message);
    }

    match &report.outcome {
        Outcome::Succeeded {
            new_version: Some(version),
        } => output.success(&format!("Deployed {} v{}", project.name, version)),
        Outcome::Succeeded { new_version: None } => {
            output.success(&format!("Deployed {}", project.name))
        }
        Outcome::Failed {
            phase,
            class,
            compensation,
        } => {
            output.error(&format!("{} during {} phase", class, phase));
            match compensation {
                Compensation::NotNeeded => {}
                Compensation::Reverted(version) => {
                    output.progress(&format!("Version restored to {}", version))
                }
                Compensation::RevertFailed(version) => output.warn(&format!(
                    "could not restore version {}; fix package.json by hand",
                    version
                )),
            }
            output.hint(class.hint());
        }
    }
}
