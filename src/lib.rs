// ABOUTME: Library root for sunrise - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod archive;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod output;
pub mod shell;
pub mod ssh;
pub mod template;
pub mod version;
