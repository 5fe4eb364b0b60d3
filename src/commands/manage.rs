// ABOUTME: Configuration management commands.
// ABOUTME: init, projects, show, add, and remove.

use std::path::Path;

use dialoguer::Confirm;
use sunrise_deploy::config::{self, ConfigStore, ProjectEntry, ServerConfig};
use sunrise_deploy::error::{Error, Result};
use sunrise_deploy::output::{Output, OutputMode};

pub fn init(path: &Path, force: bool, output: &Output) -> Result<()> {
    let store = config::init_config(path, force)?;
    output.success(&format!(
        "Wrote default configuration to {}",
        store.path().display()
    ));
    Ok(())
}

pub fn list_projects(store: &ConfigStore, output: &Output) -> Result<()> {
    let names = store.project_names();
    if output.mode() == OutputMode::Json {
        println!("{}", serde_json::to_string(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        output.progress("No projects configured.");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub fn show(store: &ConfigStore) -> Result<()> {
    print!("{}", store.config().to_json()?);
    Ok(())
}

pub fn add(store: &mut ConfigStore, name: &str, entry: ProjectEntry, output: &Output) -> Result<()> {
    ServerConfig::parse(&entry.server)
        .map_err(|e| Error::InvalidConfig(format!("server '{}': {}", entry.server, e)))?;

    store.add_project(name, entry)?;
    store.save()?;
    output.success(&format!("Added project {}", name.trim()));
    Ok(())
}

pub fn remove(store: &mut ConfigStore, name: &str, yes: bool, output: &Output) -> Result<()> {
    if !store.project_names().iter().any(|n| n == name) {
        return Err(Error::UnknownProject(name.to_string()));
    }

    if !yes
        && !Confirm::new()
            .with_prompt(format!("Remove project {}?", name))
            .default(false)
            .interact()?
    {
        output.progress("Nothing removed.");
        return Ok(());
    }

    store.remove_project(name)?;
    store.save()?;
    output.success(&format!("Removed project {}", name));
    Ok(())
}
