// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup, a recording event sink, and project fixtures.

use std::path::Path;
use std::sync::Once;

use parking_lot::Mutex;
use serde_json::{Value, json};
use sunrise_deploy::config::{DeployConfig, ProjectConfig};
use sunrise_deploy::output::{DeployEvent, EventSink};
use tempfile::TempDir;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod scripted_host;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("sunrise_deploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Event sink that keeps everything it receives.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DeployEvent>>,
    capture_output: bool,
}

#[allow(dead_code)]
impl RecordingSink {
    /// A sink that wants command output captured, as JSON and quiet output do.
    pub fn capturing() -> Self {
        Self {
            capture_output: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().clone()
    }

    /// Success flag of the last finished step with this description.
    pub fn finished(&self, description: &str) -> Option<bool> {
        self.events.lock().iter().rev().find_map(|event| match event {
            DeployEvent::StepFinished {
                description: d,
                success,
            } if d == description => Some(*success),
            _ => None,
        })
    }

    pub fn started(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DeployEvent::StepStarted { description, .. } => Some(description.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DeployEvent::Warning { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: DeployEvent) {
        self.events.lock().push(event);
    }

    fn passes_through_output(&self) -> bool {
        !self.capture_output
    }
}

/// A local project with `package.json` at 1.2.3 and a small `dist/` tree.
#[allow(dead_code)]
pub fn site_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        "{\n  \"name\": \"site\",\n  \"version\": \"1.2.3\",\n  \"private\": true\n}\n",
    )
    .unwrap();
    let dist = dir.path().join("dist");
    std::fs::create_dir_all(dist.join("assets")).unwrap();
    std::fs::write(dist.join("index.html"), "<h1>hello</h1>").unwrap();
    std::fs::write(dist.join("assets/app.js"), "console.log('hi')").unwrap();
    dir
}

/// Resolve a project named `site` rooted at `local`.
///
/// `entry` holds extra project keys (`steps`, `versionUpdate`, `buildCommand`, ...)
/// merged over the base entry.
#[allow(dead_code)]
pub fn site_project(local: &Path, entry: Value) -> ProjectConfig {
    let mut project = json!({
        "server": "deploy@test-host",
        "remote": "/srv/site",
        "local": local,
    });
    if let (Some(project), Some(extra)) = (project.as_object_mut(), entry.as_object()) {
        for (key, value) in extra {
            project.insert(key.clone(), value.clone());
        }
    }

    let config = json!({
        "default": { "zip": "dist.zip", "buildCommand": "true" },
        "projects": { "site": project },
    });
    DeployConfig::from_json(&config.to_string())
        .unwrap()
        .resolve("site")
        .unwrap()
}

/// Version string currently in `<dir>/package.json`.
#[allow(dead_code)]
pub fn package_version(dir: &Path) -> String {
    let content = std::fs::read_to_string(dir.join("package.json")).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    value["version"].as_str().unwrap().to_string()
}
