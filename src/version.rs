// ABOUTME: Semantic version handling for the project's package.json.
// ABOUTME: Reads, bumps, and reverts the `version` field while preserving key order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the metadata file holding the project version.
pub const METADATA_FILENAME: &str = "package.json";

/// Which version component a bump increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Major,
    Minor,
    #[default]
    Patch,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BumpType::Major => "major",
            BumpType::Minor => "minor",
            BumpType::Patch => "patch",
        };
        f.write_str(s)
    }
}

impl FromStr for BumpType {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(BumpType::Major),
            "minor" => Ok(BumpType::Minor),
            "patch" => Ok(BumpType::Patch),
            other => Err(VersionError::InvalidBumpType(other.to_string())),
        }
    }
}

/// A plain `X.Y.Z` version. Pre-release and build metadata are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The version after incrementing `bump`; lower components reset to zero.
    /// Fails when the incremented component is already at `u64::MAX`.
    pub fn bumped(&self, bump: BumpType) -> Result<Self, VersionError> {
        let next = |n: u64| n.checked_add(1).ok_or(VersionError::Overflow(*self));
        Ok(match bump {
            BumpType::Major => Version::new(next(self.major)?, 0, 0),
            BumpType::Minor => Version::new(self.major, next(self.minor)?, 0),
            BumpType::Patch => Version::new(self.major, self.minor, next(self.patch)?),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::InvalidVersion(s.to_string());

        let mut parts = s.split('.');
        let mut next = || -> Result<u64, VersionError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

/// Errors from reading or writing the version metadata file.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("metadata file not found: {0}")]
    Missing(PathBuf),

    #[error("metadata file is not a JSON object: {0}")]
    NotAnObject(PathBuf),

    #[error("no version field in {0}")]
    NoVersion(PathBuf),

    #[error("invalid version '{0}' (expected X.Y.Z)")]
    InvalidVersion(String),

    #[error("invalid bump type '{0}' (expected major, minor or patch)")]
    InvalidBumpType(String),

    #[error("version {0} cannot be bumped further")]
    Overflow(Version),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The version metadata file of one local project.
#[derive(Debug, Clone)]
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The `package.json` inside a project directory.
    pub fn in_project(project_dir: &Path) -> Self {
        Self::new(project_dir.join(METADATA_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current version, or `None` when the file or field is absent or unparseable.
    pub fn current(&self) -> Option<Version> {
        match self.read() {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::debug!("no current version: {}", e);
                None
            }
        }
    }

    /// Bump the stored version and write the file back, returning the new version.
    ///
    /// Returns `None` without touching the file if it or its version field is absent.
    pub fn bump(&self, bump: BumpType) -> Option<Version> {
        match self.try_bump(bump) {
            Ok((_, new)) => Some(new),
            Err(e) => {
                tracing::warn!("version bump failed: {}", e);
                None
            }
        }
    }

    /// Overwrite the version field with `version`.
    pub fn revert(&self, version: &Version) -> bool {
        match self.write(version) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("version revert failed: {}", e);
                false
            }
        }
    }

    pub fn read(&self) -> Result<Version, VersionError> {
        let doc = self.load()?;
        version_field(&doc, &self.path)?.parse()
    }

    /// Bump and persist, returning `(old, new)`.
    pub fn try_bump(&self, bump: BumpType) -> Result<(Version, Version), VersionError> {
        let mut doc = self.load()?;
        let old: Version = version_field(&doc, &self.path)?.parse()?;
        let new = old.bumped(bump)?;
        self.store(&mut doc, &new)?;
        Ok((old, new))
    }

    pub fn write(&self, version: &Version) -> Result<(), VersionError> {
        let mut doc = self.load()?;
        self.store(&mut doc, version)
    }

    fn load(&self) -> Result<Value, VersionError> {
        if !self.path.is_file() {
            return Err(VersionError::Missing(self.path.clone()));
        }
        let content = std::fs::read_to_string(&self.path)?;
        let doc: Value = serde_json::from_str(&content)?;
        if !doc.is_object() {
            return Err(VersionError::NotAnObject(self.path.clone()));
        }
        Ok(doc)
    }

    fn store(&self, doc: &mut Value, version: &Version) -> Result<(), VersionError> {
        let object = doc
            .as_object_mut()
            .ok_or_else(|| VersionError::NotAnObject(self.path.clone()))?;
        object.insert("version".to_string(), Value::String(version.to_string()));

        let mut content = serde_json::to_string_pretty(doc)?;
        content.push('\n');
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

fn version_field<'a>(doc: &'a Value, path: &Path) -> Result<&'a str, VersionError> {
    doc.get("version")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| VersionError::NoVersion(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with(content: &str) -> (TempDir, VersionFile) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(METADATA_FILENAME), content).unwrap();
        let file = VersionFile::in_project(dir.path());
        (dir, file)
    }

    #[test]
    fn parse_plain_version() {
        let v: Version = "1.4.9".parse().unwrap();
        assert_eq!(v, Version::new(1, 4, 9));
        assert_eq!(v.to_string(), "1.4.9");
    }

    #[test]
    fn reject_malformed_versions() {
        for bad in ["", "1", "1.2", "1.2.3.4", "1.2.x", "v1.2.3", "1.2.3-beta", "1..3", "-1.2.3"] {
            assert!(bad.parse::<Version>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn bump_resets_lower_components() {
        let v = Version::new(1, 4, 9);
        assert_eq!(v.bumped(BumpType::Major).unwrap(), Version::new(2, 0, 0));
        assert_eq!(v.bumped(BumpType::Minor).unwrap(), Version::new(1, 5, 0));
        assert_eq!(v.bumped(BumpType::Patch).unwrap(), Version::new(1, 4, 10));
    }

    #[test]
    fn bump_at_component_limit_is_an_error() {
        let v: Version = "18446744073709551615.0.0".parse().unwrap();
        assert!(matches!(v.bumped(BumpType::Major), Err(VersionError::Overflow(at)) if at == v));
        assert_eq!(v.bumped(BumpType::Minor).unwrap(), Version::new(u64::MAX, 1, 0));

        let top = Version::new(0, u64::MAX, u64::MAX);
        assert!(top.bumped(BumpType::Minor).is_err());
        assert!(top.bumped(BumpType::Patch).is_err());
    }

    #[test]
    fn overflowing_bump_leaves_file_untouched() {
        let original = r#"{"version":"18446744073709551615.0.0"}"#;
        let (_dir, file) = project_with(original);

        assert_eq!(file.bump(BumpType::Major), None);
        assert!(matches!(file.try_bump(BumpType::Major), Err(VersionError::Overflow(_))));
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), original);
    }

    #[test]
    fn bump_type_round_trips_through_strings() {
        assert_eq!("minor".parse::<BumpType>().unwrap(), BumpType::Minor);
        assert_eq!(BumpType::Major.to_string(), "major");
        assert!("huge".parse::<BumpType>().is_err());
    }

    #[test]
    fn bump_writes_file_with_two_space_indent() {
        let (_dir, file) = project_with(r#"{"name":"web","version":"1.4.9","private":true}"#);

        assert_eq!(file.bump(BumpType::Minor), Some(Version::new(1, 5, 0)));

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "{\n  \"name\": \"web\",\n  \"version\": \"1.5.0\",\n  \"private\": true\n}\n"
        );
    }

    #[test]
    fn bump_without_version_field_leaves_file_untouched() {
        let original = r#"{"name":"web"}"#;
        let (_dir, file) = project_with(original);

        assert_eq!(file.bump(BumpType::Patch), None);
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), original);
    }

    #[test]
    fn missing_file_has_no_version() {
        let dir = TempDir::new().unwrap();
        let file = VersionFile::in_project(dir.path());

        assert_eq!(file.current(), None);
        assert_eq!(file.bump(BumpType::Patch), None);
        assert!(!file.path().exists());
        assert!(matches!(file.read(), Err(VersionError::Missing(_))));
    }

    #[test]
    fn unparseable_version_reads_as_none() {
        let (_dir, file) = project_with(r#"{"version":"next"}"#);
        assert_eq!(file.current(), None);
    }

    #[test]
    fn revert_restores_previous_version() {
        let (_dir, file) = project_with(r#"{"version":"2.0.1"}"#);
        let before = file.current().unwrap();

        file.bump(BumpType::Major).unwrap();
        assert_eq!(file.current(), Some(Version::new(3, 0, 0)));

        assert!(file.revert(&before));
        assert_eq!(file.current(), Some(before));
    }

    #[test]
    fn revert_fails_when_file_is_gone() {
        let dir = TempDir::new().unwrap();
        let file = VersionFile::in_project(dir.path());
        assert!(!file.revert(&Version::new(1, 0, 0)));
    }
}
