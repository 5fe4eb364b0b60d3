// ABOUTME: Server address parsing for SSH connections.
// ABOUTME: Parses formats like "host", "user@host", "host:port", "user@host:port".

use std::path::Path;

use crate::ssh::SessionConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
}

impl ServerConfig {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("server address cannot be empty".to_string());
        }

        // Parse format: [user@]host[:port]
        let (user_part, rest) = match s.split_once('@') {
            Some((user, rest)) => (Some(user), rest),
            None => (None, s),
        };

        if user_part.is_some_and(str::is_empty) {
            return Err("user cannot be empty".to_string());
        }

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port_str)) => {
                let port = port_str
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port: {}", port_str))?;
                (host, port)
            }
            None => (rest, 22),
        };

        if host.is_empty() {
            return Err("hostname cannot be empty".to_string());
        }

        Ok(ServerConfig {
            host: host.to_string(),
            port,
            user: user_part.map(str::to_string),
        })
    }

    /// Login user: the explicit one, else `$USER`, else `root`.
    pub fn login_user(&self) -> String {
        self.user
            .clone()
            .unwrap_or_else(|| std::env::var("USER").unwrap_or_else(|_| "root".to_string()))
    }

    /// Build the SSH session configuration for this server.
    pub fn ssh_session_config(
        &self,
        identity_file: Option<&Path>,
        trust_first_connection: bool,
    ) -> SessionConfig {
        let config = SessionConfig::new(&self.host, self.login_user())
            .port(self.port)
            .trust_on_first_use(trust_first_connection);

        match identity_file {
            Some(path) => config.key_path(path),
            None => config,
        }
    }
}
