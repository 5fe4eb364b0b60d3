// ABOUTME: Command module aggregator for the sunrise CLI.
// ABOUTME: Re-exports deploy, configuration, and interactive menu handlers.

mod deploy;
mod manage;
mod menu;

pub use deploy::deploy;
pub use manage::{add, init, list_projects, remove, show};
pub use menu::run_menu;
