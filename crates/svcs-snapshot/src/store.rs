//! Content-addressed snapshot storage.

use crate::error::{IoContext, SnapshotError, SnapshotResult};
use crate::{Digest, RepoLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TEMP_PREFIX: &str = ".tmp-";
const MANIFEST_EXT: &str = "json";

/// Ordered list of paths recorded for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Manifest {
    files: Vec<PathBuf>,
}

/// Storage for committed snapshots, keyed by digest.
///
/// Each snapshot is a directory of plain file copies next to a manifest:
/// ```text
/// commits/
///   <digest>/
///     <relative_path>  # byte-exact copy
///   <digest>.json      # staged paths, in order
/// ```
/// A snapshot is built under `.tmp-<digest>/` and renamed into place, so a
/// directory named after a digest is always complete.
#[derive(Debug, Clone)]
pub struct CommitStore {
    layout: RepoLayout,
}

impl CommitStore {
    pub fn new(layout: RepoLayout) -> Self {
        Self { layout }
    }

    /// Check whether a snapshot for `digest` has been persisted.
    pub fn exists(&self, digest: &Digest) -> bool {
        self.snapshot_dir(digest).is_dir()
    }

    /// Copy the current content of `files` into a new snapshot under `digest`.
    ///
    /// # Arguments
    /// * `digest` - Digest of `files`, as computed by the hasher
    /// * `files` - Paths relative to the work-tree root
    pub fn save(&self, digest: &Digest, files: &[PathBuf]) -> SnapshotResult<()> {
        if self.exists(digest) {
            return Err(SnapshotError::state(format!(
                "Snapshot {} is already stored",
                digest
            )));
        }

        let commits_dir = self.layout.commits_dir();
        let temp_dir = commits_dir.join(format!("{TEMP_PREFIX}{digest}"));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).at(&temp_dir)?;
        }
        fs::create_dir_all(&temp_dir).at(&temp_dir)?;

        if let Err(e) = self.copy_files(&temp_dir, files) {
            if let Err(cleanup) = fs::remove_dir_all(&temp_dir) {
                warn!(path = %temp_dir.display(), error = %cleanup, "Failed to remove partial snapshot");
            }
            return Err(e);
        }

        let snapshot_dir = self.snapshot_dir(digest);
        fs::rename(&temp_dir, &snapshot_dir).at(&snapshot_dir)?;

        let manifest = Manifest {
            files: files.to_vec(),
        };
        let manifest_path = self.manifest_path(digest);
        let manifest_tmp = manifest_path.with_extension("json.tmp");
        fs::write(&manifest_tmp, serde_json::to_string_pretty(&manifest)?).at(&manifest_tmp)?;
        fs::rename(&manifest_tmp, &manifest_path).at(&manifest_path)?;

        info!("Stored snapshot {} with {} files", digest, files.len());
        Ok(())
    }

    /// Read the stored bytes of `path` in snapshot `digest`.
    pub fn read(&self, digest: &Digest, path: &Path) -> SnapshotResult<Vec<u8>> {
        let not_found = || SnapshotError::NotFound {
            hash: digest.to_string(),
            path: path.to_path_buf(),
        };

        let stored = svcs_util::path::safe_join(&self.snapshot_dir(digest), path)
            .ok_or_else(not_found)?;
        match fs::read(&stored) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(SnapshotError::io(stored, e)),
        }
    }

    /// Staged paths recorded for `digest`, or `None` if no manifest exists.
    pub fn manifest(&self, digest: &Digest) -> SnapshotResult<Option<Vec<PathBuf>>> {
        let path = self.manifest_path(digest);
        match fs::read_to_string(&path) {
            Ok(json) => {
                let manifest: Manifest = serde_json::from_str(&json)?;
                Ok(Some(manifest.files))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SnapshotError::io(path, e)),
        }
    }

    /// Digests of all stored snapshots.
    pub fn digests(&self) -> SnapshotResult<Vec<Digest>> {
        let commits_dir = self.layout.commits_dir();
        let entries = match fs::read_dir(&commits_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::io(commits_dir, e)),
        };

        let mut digests = Vec::new();
        for entry in entries {
            let entry = entry.at(&commits_dir)?;
            if !entry.file_type().at(entry.path())?.is_dir() {
                continue;
            }
            // Temp dirs and stray directories don't parse as digests.
            if let Ok(digest) = Digest::parse(&entry.file_name().to_string_lossy()) {
                digests.push(digest);
            }
        }
        digests.sort();
        Ok(digests)
    }

    /// Delete a snapshot and its manifest.
    pub fn remove(&self, digest: &Digest) -> SnapshotResult<()> {
        let snapshot_dir = self.snapshot_dir(digest);
        if snapshot_dir.exists() {
            fs::remove_dir_all(&snapshot_dir).at(&snapshot_dir)?;
        }

        let manifest_path = self.manifest_path(digest);
        match fs::remove_file(&manifest_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SnapshotError::io(manifest_path, e)),
        }

        info!("Removed snapshot {}", digest);
        Ok(())
    }

    /// Remove leftovers of interrupted saves. Returns how many were removed.
    pub fn sweep_temp(&self) -> SnapshotResult<usize> {
        let commits_dir = self.layout.commits_dir();
        let entries = match fs::read_dir(&commits_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(SnapshotError::io(commits_dir, e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.at(&commits_dir)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if name.starts_with(TEMP_PREFIX) && path.is_dir() {
                fs::remove_dir_all(&path).at(&path)?;
            } else if name.ends_with(".json.tmp") {
                fs::remove_file(&path).at(&path)?;
            } else {
                continue;
            }
            warn!(path = %path.display(), "Removed leftover from interrupted commit");
            removed += 1;
        }
        Ok(removed)
    }

    fn copy_files(&self, target_dir: &Path, files: &[PathBuf]) -> SnapshotResult<()> {
        for file in files {
            let src = self.layout.work_path(file)?;
            let dst = svcs_util::path::safe_join(target_dir, file).ok_or_else(|| {
                SnapshotError::validation(format!("Invalid staged path {}", file.display()))
            })?;

            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent).at(parent)?;
            }

            fs::copy(&src, &dst).at(&src)?;
            debug!("Snapshotted: {:?}", file);
        }
        Ok(())
    }

    /// Get the directory for a snapshot.
    fn snapshot_dir(&self, digest: &Digest) -> PathBuf {
        self.layout.commits_dir().join(digest.as_str())
    }

    fn manifest_path(&self, digest: &Digest) -> PathBuf {
        self.layout
            .commits_dir()
            .join(format!("{}.{}", digest, MANIFEST_EXT))
    }
}
