// ABOUTME: Streams a build output directory into a deflate-compressed zip archive.
// ABOUTME: Entries are stored relative to the source directory, with no root folder.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

/// Highest deflate compression level.
const COMPRESSION_LEVEL: i32 = 9;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("source directory not found: {0}")]
    SourceMissing(PathBuf),

    #[error("failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive task failed: {0}")]
    Task(String),
}

/// What ended up in a finished archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Number of file entries written.
    pub files: usize,
    /// Size of the archive on disk.
    pub bytes: u64,
}

/// Archive `source_dir` into `out_path` on the blocking pool.
pub async fn zip_directory(
    source_dir: &Path,
    out_path: &Path,
) -> Result<ArchiveSummary, ArchiveError> {
    let source_dir = source_dir.to_path_buf();
    let out_path = out_path.to_path_buf();
    tokio::task::spawn_blocking(move || write_archive(&source_dir, &out_path))
        .await
        .map_err(|e| ArchiveError::Task(e.to_string()))?
}

/// Archive `source_dir` into `out_path`.
///
/// File contents are copied through the writer one file at a time, so memory
/// use does not grow with the size of the build. The summary is returned only
/// after the output file has been flushed and synced.
pub fn write_archive(source_dir: &Path, out_path: &Path) -> Result<ArchiveSummary, ArchiveError> {
    if !source_dir.is_dir() {
        return Err(ArchiveError::SourceMissing(source_dir.to_path_buf()));
    }

    let out_abs = out_path
        .parent()
        .and_then(|p| p.canonicalize().ok())
        .zip(out_path.file_name())
        .map(|(dir, name)| dir.join(name));

    let file = File::create(out_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .unix_permissions(0o644);
    let dir_options = options.unix_permissions(0o755);

    let root = source_dir.canonicalize()?;
    let mut files = 0usize;

    for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone()),
            reason: e.to_string(),
        })?;
        let path = entry.path();

        if out_abs.as_deref() == Some(path) {
            continue;
        }

        let name = entry_name(&root, path);
        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), dir_options)?;
        } else {
            zip.start_file(name, options)?;
            let mut input = File::open(path)?;
            std::io::copy(&mut input, &mut zip)?;
            files += 1;
        }
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| ArchiveError::Io(e.into_error()))?;
    file.sync_all()?;
    let bytes = file.metadata()?.len();

    tracing::debug!(files, bytes, "archive written to {}", out_path.display());
    Ok(ArchiveSummary { files, bytes })
}

/// Archive entry name: path relative to the root, always `/`-separated.
fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
