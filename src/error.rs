// ABOUTME: Application-wide error types for sunrise.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("cannot determine home directory")]
    HomeNotFound,

    #[error("no projects configured; add one with `sunrise add`")]
    NoProjects,

    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("SSH error: {0}")]
    Ssh(#[from] crate::ssh::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
