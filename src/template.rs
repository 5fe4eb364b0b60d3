// ABOUTME: Placeholder expansion for operator-supplied command templates.
// ABOUTME: Replaces $SERVER, $REMOTE and $ZIP with resolved project values.

use crate::config::ProjectConfig;

/// Values substituted into command templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variables<'a> {
    pub server: &'a str,
    pub remote: &'a str,
    pub zip: &'a str,
}

impl<'a> From<&'a ProjectConfig> for Variables<'a> {
    fn from(config: &'a ProjectConfig) -> Self {
        Self {
            server: &config.server,
            remote: &config.remote,
            zip: &config.zip,
        }
    }
}

impl Variables<'_> {
    /// Replace every occurrence of each token, in the order SERVER, REMOTE, ZIP.
    ///
    /// Values are inserted verbatim; nothing is shell-escaped.
    pub fn expand(&self, template: &str) -> String {
        template
            .replace("$SERVER", self.server)
            .replace("$REMOTE", self.remote)
            .replace("$ZIP", self.zip)
    }
}

/// Expand a command template against a resolved project.
pub fn expand(template: &str, config: &ProjectConfig) -> String {
    Variables::from(config).expand(template)
}
