// ABOUTME: SSH session that connects on first use.
// ABOUTME: Runs with only local steps never dial out, and no session idles through a build.

use tokio::sync::OnceCell;

use super::client::{Session, SessionConfig};
use super::error::Result;

/// Holds connection settings until a remote operation needs the session.
///
/// A failed connect leaves the cell empty, so the next call tries again.
pub struct LazySession {
    config: SessionConfig,
    session: OnceCell<Session>,
}

impl LazySession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            session: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.session.initialized()
    }

    /// The open session, connecting first if needed.
    pub async fn session(&self) -> Result<&Session> {
        self.session
            .get_or_try_init(|| async {
                tracing::info!("connecting to {}", self.config.target());
                Session::connect(self.config.clone()).await
            })
            .await
    }

    /// Close the session if one was opened.
    pub async fn disconnect(self) -> Result<()> {
        match self.session.into_inner() {
            Some(session) => session.disconnect().await,
            None => Ok(()),
        }
    }
}
