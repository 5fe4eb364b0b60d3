// ABOUTME: Entry point for the sunrise CLI application.
// ABOUTME: Parses arguments, sets up logging, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use sunrise_deploy::config::{ConfigStore, ProjectEntry};
use sunrise_deploy::error::Result;
use sunrise_deploy::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output_mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(output_mode);

    match run(cli, &mut output).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Dispatch a command and return the process exit code.
async fn run(cli: Cli, output: &mut Output) -> Result<i32> {
    let config_path = match cli.config {
        Some(path) => path,
        None => ConfigStore::default_path()?,
    };

    match cli.command {
        Some(Commands::Init { force }) => {
            commands::init(&config_path, force, output)?;
            Ok(0)
        }
        None => {
            let mut store = open_store(&config_path, output)?;
            commands::run_menu(&mut store, output).await
        }
        Some(Commands::Deploy { project, yes }) => {
            let store = open_store(&config_path, output)?;
            commands::deploy(&store, project.as_deref(), yes, output).await
        }
        Some(Commands::Projects) => {
            let store = open_store(&config_path, output)?;
            commands::list_projects(&store, output)?;
            Ok(0)
        }
        Some(Commands::Show) => {
            let store = open_store(&config_path, output)?;
            commands::show(&store)?;
            Ok(0)
        }
        Some(Commands::Add {
            name,
            server,
            remote,
            local,
            no_extract,
        }) => {
            let mut store = open_store(&config_path, output)?;
            let local = match local {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            let entry = ProjectEntry::new(server, remote, local).with_switch(!no_extract);
            commands::add(&mut store, &name, entry, output)?;
            Ok(0)
        }
        Some(Commands::Remove { name, yes }) => {
            let mut store = open_store(&config_path, output)?;
            commands::remove(&mut store, &name, yes, output)?;
            Ok(0)
        }
    }
}

/// Load the configuration, creating the default file on first use.
fn open_store(path: &Path, output: &Output) -> Result<ConfigStore> {
    let store = ConfigStore::open(path)?;
    if store.was_created() {
        output.progress(&format!(
            "Created default configuration at {}",
            store.path().display()
        ));
    }
    Ok(store)
}
