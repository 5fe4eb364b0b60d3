// ABOUTME: Configuration types and persistence for deploy.config.json.
// ABOUTME: Handles JSON parsing, default/project merging, and project CRUD.

mod init;
mod project;
mod server;
mod steps;

pub use init::{default_config, init_config};
pub use project::{DIST_DIR, ProjectConfig, REMOTE_TEMP_DIR, VersionUpdate};
pub use server::ServerConfig;
pub use steps::{StepConfig, StepKind, StepOverrides, Steps};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = "deploy";
pub const CONFIG_FILENAME: &str = "deploy.config.json";

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default)]
    pub default: Defaults,

    #[serde(default)]
    pub projects: BTreeMap<String, ProjectEntry>,
}

/// Settings shared by every project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    #[serde(default = "default_zip")]
    pub zip: String,

    #[serde(default = "default_build_command")]
    pub build_command: String,

    #[serde(default)]
    pub version_update: VersionUpdate,

    #[serde(default)]
    pub steps: StepOverrides,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            zip: default_zip(),
            build_command: default_build_command(),
            version_update: VersionUpdate::default(),
            steps: StepOverrides::default(),
        }
    }
}

fn default_zip() -> String {
    "dist.zip".to_string()
}

fn default_build_command() -> String {
    "npm run build".to_string()
}

fn default_trust_first_connection() -> bool {
    true
}

/// One project as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub server: String,
    pub remote: String,
    pub local: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_update: Option<VersionUpdate>,

    #[serde(default)]
    pub steps: StepOverrides,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<PathBuf>,

    #[serde(default = "default_trust_first_connection")]
    pub trust_first_connection: bool,
}

impl ProjectEntry {
    pub fn new(server: impl Into<String>, remote: impl Into<String>, local: impl Into<PathBuf>) -> Self {
        Self {
            server: server.into(),
            remote: remote.into(),
            local: local.into(),
            zip: None,
            build_command: None,
            version_update: None,
            steps: StepOverrides::default(),
            identity_file: None,
            trust_first_connection: default_trust_first_connection(),
        }
    }

    /// Enable or disable the switch step for this project.
    pub fn with_switch(mut self, enabled: bool) -> Self {
        self.steps.extract = Some(StepConfig {
            enabled,
            ..Default::default()
        });
        self
    }
}

impl DeployConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Merge defaults and the named project's overrides.
    pub fn resolve(&self, name: &str) -> Result<ProjectConfig> {
        let entry = self
            .projects
            .get(name)
            .ok_or_else(|| Error::UnknownProject(name.to_string()))?;
        let defaults = &self.default;

        let version_update = entry
            .version_update
            .clone()
            .unwrap_or_else(|| defaults.version_update.clone());
        let steps = Steps::resolve(&entry.steps, &defaults.steps, version_update.as_step());

        Ok(ProjectConfig {
            name: name.to_string(),
            server: entry.server.clone(),
            remote: entry.remote.trim_end_matches('/').to_string(),
            local: entry.local.clone(),
            zip: entry.zip.clone().unwrap_or_else(|| defaults.zip.clone()),
            build_command: entry
                .build_command
                .clone()
                .unwrap_or_else(|| defaults.build_command.clone()),
            version_update,
            steps,
            identity_file: entry.identity_file.clone(),
            trust_first_connection: entry.trust_first_connection,
        })
    }

    /// Servers already used by some project, sorted and deduplicated.
    pub fn known_servers(&self) -> Vec<&str> {
        let mut servers: Vec<&str> = self.projects.values().map(|p| p.server.as_str()).collect();
        servers.sort_unstable();
        servers.dedup();
        servers
    }
}

/// Which project a command should act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one project applies.
    Project(String),
    /// Several projects exist and none was named; the caller has to ask.
    Choose(Vec<String>),
}

/// The configuration file on disk plus its parsed contents.
///
/// Created once per process and passed by reference to whatever needs it.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: DeployConfig,
    created: bool,
}

impl ConfigStore {
    /// `~/deploy/deploy.config.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILENAME))
    }

    /// Load an existing configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = DeployConfig::from_json(&content)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            config,
            created: false,
        })
    }

    /// Load the configuration, writing the default one first if the file is missing.
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_file() {
            return Self::load(path);
        }

        let store = Self {
            path: path.to_path_buf(),
            config: default_config(),
            created: true,
        };
        store.save()?;
        tracing::info!("created default configuration at {}", path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Whether `open` had to create the file.
    pub fn was_created(&self) -> bool {
        self.created
    }

    pub fn project_names(&self) -> Vec<String> {
        self.config.projects.keys().cloned().collect()
    }

    pub fn resolve(&self, name: &str) -> Result<ProjectConfig> {
        self.config.resolve(name)
    }

    /// Pick the project to act on.
    pub fn select_project(&self, requested: Option<&str>) -> Result<Selection> {
        if let Some(name) = requested {
            if !self.config.projects.contains_key(name) {
                return Err(Error::UnknownProject(name.to_string()));
            }
            return Ok(Selection::Project(name.to_string()));
        }

        let mut names = self.project_names();
        match names.len() {
            0 => Err(Error::NoProjects),
            1 => Ok(Selection::Project(names.remove(0))),
            _ => Ok(Selection::Choose(names)),
        }
    }

    pub fn add_project(&mut self, name: &str, entry: ProjectEntry) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidConfig("project name cannot be empty".to_string()));
        }
        if self.config.projects.contains_key(name) {
            return Err(Error::ProjectExists(name.to_string()));
        }
        self.config.projects.insert(name.to_string(), entry);
        Ok(())
    }

    pub fn remove_project(&mut self, name: &str) -> Result<ProjectEntry> {
        self.config
            .projects
            .remove(name)
            .ok_or_else(|| Error::UnknownProject(name.to_string()))
    }

    /// Write the configuration back to its file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.config.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips() {
        let config = default_config();
        let json = config.to_json().unwrap();
        assert_eq!(DeployConfig::from_json(&json).unwrap(), config);
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_remote() {
        let mut config = default_config();
        config
            .projects
            .insert("web".to_string(), ProjectEntry::new("h", "/srv/web/", "/tmp"));

        let project = config.resolve("web").unwrap();
        assert_eq!(project.remote, "/srv/web");
    }

    #[test]
    fn known_servers_are_unique() {
        let mut config = DeployConfig::default();
        config
            .projects
            .insert("a".to_string(), ProjectEntry::new("web1", "/a", "/a"));
        config
            .projects
            .insert("b".to_string(), ProjectEntry::new("web1", "/b", "/b"));
        config
            .projects
            .insert("c".to_string(), ProjectEntry::new("api", "/c", "/c"));

        assert_eq!(config.known_servers(), vec!["api", "web1"]);
    }
}
