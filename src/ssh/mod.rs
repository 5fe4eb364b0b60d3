// ABOUTME: SSH client module for the remote deployment host.
// ABOUTME: Supports SSH agent and key-based authentication with known_hosts verification.

mod client;
mod error;
mod lazy;
mod upload;

pub use client::{CommandOutput, Session, SessionConfig};
pub use error::{Error, Result};
pub use lazy::LazySession;
