// ABOUTME: Resolved per-project deployment settings.
// ABOUTME: Merges global defaults with project overrides and derives local/remote paths.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::server::ServerConfig;
use super::steps::{StepConfig, StepKind, Steps};
use crate::version::BumpType;

/// Local build output directory, relative to the project.
pub const DIST_DIR: &str = "dist";

/// Remote staging directory, relative to the remote project path.
pub const REMOTE_TEMP_DIR: &str = "temp";

/// Version bump policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionUpdate {
    #[serde(default)]
    pub enabled: bool,

    #[serde(rename = "type", default)]
    pub bump: BumpType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VersionUpdate {
    pub(super) fn as_step(&self) -> StepConfig {
        StepConfig {
            enabled: self.enabled,
            description: self.description.clone(),
            ..Default::default()
        }
    }
}

/// Everything one deployment run needs to know about its project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    /// SSH destination, `[user@]host[:port]`.
    pub server: String,
    /// Project directory on the remote host; the live site is `<remote>/dist`.
    pub remote: String,
    /// Local project directory.
    pub local: PathBuf,
    /// Archive file name.
    pub zip: String,
    pub build_command: String,
    pub version_update: VersionUpdate,
    pub steps: Steps,
    pub identity_file: Option<PathBuf>,
    pub trust_first_connection: bool,
}

impl ProjectConfig {
    /// Local build output that gets archived.
    pub fn dist_dir(&self) -> PathBuf {
        self.local.join(DIST_DIR)
    }

    /// Local archive path.
    pub fn archive_path(&self) -> PathBuf {
        self.local.join(&self.zip)
    }

    pub fn remote_temp_dir(&self) -> String {
        format!("{}/{}", self.remote, REMOTE_TEMP_DIR)
    }

    pub fn remote_archive_path(&self) -> String {
        format!("{}/{}", self.remote_temp_dir(), self.zip)
    }

    pub fn remote_live_dir(&self) -> String {
        format!("{}/{}", self.remote, DIST_DIR)
    }

    /// `mkdir -p <remote>/temp`
    pub fn ensure_temp_command(&self) -> String {
        format!("mkdir -p {}", self.remote_temp_dir())
    }

    /// The single cut-over command: unpack the staged archive, move it live,
    /// and drop the staging directory.
    pub fn switch_command(&self) -> String {
        let temp = self.remote_temp_dir();
        format!(
            "cd {temp} && unzip {archive} && mv {temp}/* {live} && rm -rf {temp}",
            archive = self.remote_archive_path(),
            live = self.remote_live_dir(),
        )
    }

    pub fn server_config(&self) -> Result<ServerConfig, String> {
        ServerConfig::parse(&self.server)
    }

    /// Problems that make a run impossible before anything is touched.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Err(e) = self.server_config() {
            problems.push(format!("server: {}", e));
        }
        if self.remote.trim().is_empty() {
            problems.push("remote path is empty".to_string());
        }
        if self.zip.trim().is_empty() || self.zip.contains('/') {
            problems.push(format!("invalid archive name '{}'", self.zip));
        }
        if !self.local.is_dir() {
            problems.push(format!(
                "local project directory not found: {}",
                self.local.display()
            ));
        }
        if self.steps.is_enabled(StepKind::Build) && self.build_command.trim().is_empty() {
            problems.push("build step is enabled but no build command is set".to_string());
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::steps::StepOverrides;

    fn project(local: PathBuf) -> ProjectConfig {
        ProjectConfig {
            name: "web".to_string(),
            server: "deploy@web1".to_string(),
            remote: "/srv/web".to_string(),
            local,
            zip: "dist.zip".to_string(),
            build_command: "npm run build".to_string(),
            version_update: VersionUpdate::default(),
            steps: Steps::resolve(
                &StepOverrides::default(),
                &StepOverrides::default(),
                StepConfig::disabled(),
            ),
            identity_file: None,
            trust_first_connection: true,
        }
    }

    #[test]
    fn remote_command_shapes() {
        let p = project(PathBuf::from("/home/me/web"));
        assert_eq!(p.ensure_temp_command(), "mkdir -p /srv/web/temp");
        assert_eq!(p.remote_archive_path(), "/srv/web/temp/dist.zip");
        assert_eq!(
            p.switch_command(),
            "cd /srv/web/temp && unzip /srv/web/temp/dist.zip && mv /srv/web/temp/* /srv/web/dist && rm -rf /srv/web/temp"
        );
    }

    #[test]
    fn local_paths() {
        let p = project(PathBuf::from("/home/me/web"));
        assert_eq!(p.dist_dir(), PathBuf::from("/home/me/web/dist"));
        assert_eq!(p.archive_path(), PathBuf::from("/home/me/web/dist.zip"));
    }

    #[test]
    fn valid_project_has_no_problems() {
        let dir = tempfile::tempdir().unwrap();
        assert!(project(dir.path().to_path_buf()).problems().is_empty());
    }

    #[test]
    fn problems_are_collected() {
        let mut p = project(PathBuf::from("/definitely/not/here"));
        p.server = String::new();
        p.remote = " ".to_string();
        p.steps.build.enabled = true;
        p.build_command = String::new();

        let problems = p.problems();
        assert_eq!(problems.len(), 4, "{problems:?}");
    }

    #[test]
    fn version_update_parses_type_key() {
        let v: VersionUpdate = serde_json::from_str(r#"{"enabled":true,"type":"minor"}"#).unwrap();
        assert!(v.enabled);
        assert_eq!(v.bump, BumpType::Minor);
    }
}
