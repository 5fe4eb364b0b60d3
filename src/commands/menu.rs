// ABOUTME: Interactive menu shown when sunrise runs without a subcommand.
// ABOUTME: Loops over a closed set of actions until the user deploys or exits.

use dialoguer::{Confirm, Input, Select};
use sunrise_deploy::config::{ConfigStore, ProjectEntry};
use sunrise_deploy::error::Result;
use sunrise_deploy::output::Output;

use super::deploy::deploy;
use super::manage::{add, remove, show};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Deploy,
    ViewConfig,
    AddProject,
    RemoveProject,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 5] = [
        MenuAction::Deploy,
        MenuAction::ViewConfig,
        MenuAction::AddProject,
        MenuAction::RemoveProject,
        MenuAction::Exit,
    ];

    fn label(&self) -> &'static str {
        match self {
            MenuAction::Deploy => "Deploy a project",
            MenuAction::ViewConfig => "View configuration",
            MenuAction::AddProject => "Add a project",
            MenuAction::RemoveProject => "Remove a project",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Run the menu. Returns the exit code of the deployment if one was started.
pub async fn run_menu(store: &mut ConfigStore, output: &mut Output) -> Result<i32> {
    let mut next = None;
    loop {
        let action = match next.take() {
            Some(action) => action,
            None => prompt_action()?,
        };

        match action {
            MenuAction::Deploy if store.project_names().is_empty() => {
                output.progress("No projects configured yet. Add one first.");
                next = Some(MenuAction::AddProject);
            }
            MenuAction::Deploy => return deploy(store, None, false, output).await,
            MenuAction::ViewConfig => show(store)?,
            MenuAction::AddProject => add_interactive(store, output)?,
            MenuAction::RemoveProject => remove_interactive(store, output)?,
            MenuAction::Exit => return Ok(0),
        }
    }
}

fn prompt_action() -> Result<MenuAction> {
    let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();
    let index = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MenuAction::ALL[index])
}

fn add_interactive(store: &mut ConfigStore, output: &Output) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let default_name = cwd
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name_input = Input::<String>::new().with_prompt("Project name");
    if !default_name.is_empty() {
        name_input = name_input.default(default_name);
    }
    let name = name_input.interact_text()?;

    let local = Input::<String>::new()
        .with_prompt("Local project path")
        .default(cwd.display().to_string())
        .interact_text()?;
    let remote = Input::<String>::new()
        .with_prompt("Remote project path (the live site is <path>/dist)")
        .interact_text()?;
    let server = prompt_server(&store.config().known_servers())?;
    let switch = Confirm::new()
        .with_prompt("Switch the new version live after upload?")
        .default(true)
        .interact()?;

    let entry = ProjectEntry::new(server, remote, local).with_switch(switch);
    add(store, &name, entry, output)
}

fn prompt_server(known: &[&str]) -> Result<String> {
    if !known.is_empty() {
        let mut items: Vec<&str> = known.to_vec();
        items.push("Enter a new server");
        let index = Select::new()
            .with_prompt("Server")
            .items(&items)
            .default(0)
            .interact()?;
        if index < known.len() {
            return Ok(known[index].to_string());
        }
    }

    let server = Input::<String>::new()
        .with_prompt("Server ([user@]host[:port])")
        .interact_text()?;
    Ok(server)
}

fn remove_interactive(store: &mut ConfigStore, output: &Output) -> Result<()> {
    let names = store.project_names();
    if names.is_empty() {
        output.progress("No projects configured.");
        return Ok(());
    }

    let index = Select::new()
        .with_prompt("Which project do you want to remove?")
        .items(&names)
        .default(0)
        .interact()?;
    remove(store, &names[index], false, output)
}
