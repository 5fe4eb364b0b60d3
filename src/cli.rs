// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sunrise")]
#[command(about = "Build, package, upload and switch static sites over SSH")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (default: ~/deploy/deploy.config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only warnings, failures and the final result)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Without a subcommand an interactive menu is shown
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a project
    Deploy {
        /// Project name (optional when only one project is configured)
        project: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List configured projects
    Projects,

    /// Print the configuration file
    Show,

    /// Add a project
    Add {
        /// Project name
        name: String,

        /// SSH destination, [user@]host[:port]
        #[arg(long)]
        server: String,

        /// Project directory on the server; the live site is <REMOTE>/dist
        #[arg(long)]
        remote: String,

        /// Local project directory (default: current directory)
        #[arg(long)]
        local: Option<PathBuf>,

        /// Stage the archive without switching it live
        #[arg(long)]
        no_extract: bool,
    },

    /// Remove a project
    Remove {
        /// Project name
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
