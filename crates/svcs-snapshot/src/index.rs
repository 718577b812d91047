//! Staging index.
//!
//! The staged set is persisted as one relative path per line. It is an
//! order-preserving set: insertion order decides hash input order, and a path
//! is never staged twice.

use crate::error::{IoContext, SnapshotError, SnapshotResult};
use crate::RepoLayout;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered set of staged paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFiles {
    order: Vec<PathBuf>,
    members: HashSet<PathBuf>,
}

impl StagedFiles {
    /// Insert a path, returning `false` if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        if !self.members.insert(path.clone()) {
            return false;
        }
        self.order.push(path);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.members.contains(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.order
    }
}

impl FromIterator<PathBuf> for StagedFiles {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut staged = Self::default();
        for path in iter {
            staged.insert(path);
        }
        staged
    }
}

/// Result of staging a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The path was appended to the staged set.
    Tracked(PathBuf),
    /// The path was already staged; nothing was written.
    AlreadyTracked(PathBuf),
}

impl AddOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Tracked(p) | Self::AlreadyTracked(p) => p,
        }
    }
}

impl std::fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tracked(p) => write!(f, "The file '{}' is tracked.", p.display()),
            Self::AlreadyTracked(p) => write!(f, "The file '{}' is already tracked.", p.display()),
        }
    }
}

/// Persistent list of files marked for the next commit.
#[derive(Debug, Clone)]
pub struct StagingIndex {
    layout: RepoLayout,
}

impl StagingIndex {
    pub fn new(layout: RepoLayout) -> Self {
        Self { layout }
    }

    /// Stage `path`.
    ///
    /// The path must name a readable regular file inside the work tree. On
    /// failure nothing is written.
    pub fn add(&self, path: &Path) -> SnapshotResult<AddOutcome> {
        let relative = self.layout.relativize(path)?;
        let line = svcs_util::path::to_slash(&relative);
        if line.contains('\n') {
            return Err(SnapshotError::validation(
                "File names containing newlines cannot be staged",
            ));
        }

        let full = self.layout.work_path(&relative)?;
        let readable = fs::metadata(&full).is_ok_and(|m| m.is_file()) && File::open(&full).is_ok();
        if !readable {
            return Err(SnapshotError::PathNotFound(path.to_path_buf()));
        }

        if self.load()?.contains(&relative) {
            debug!(path = %relative.display(), "Path already staged");
            return Ok(AddOutcome::AlreadyTracked(relative));
        }

        let index_file = self.layout.index_file();
        fs::create_dir_all(self.layout.metadata_dir()).at(self.layout.metadata_dir())?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&index_file)
            .at(&index_file)?;
        writeln!(file, "{line}").at(&index_file)?;

        debug!(path = %relative.display(), "Staged");
        Ok(AddOutcome::Tracked(relative))
    }

    /// Currently staged paths, in staging order.
    pub fn list(&self) -> SnapshotResult<Vec<PathBuf>> {
        Ok(self.load()?.into_vec())
    }

    /// Empty the staged set. Succeeds if nothing was ever staged.
    pub fn clear(&self) -> SnapshotResult<()> {
        let index_file = self.layout.index_file();
        match OpenOptions::new().write(true).truncate(true).open(&index_file) {
            Ok(_) => {
                debug!("Cleared staging index");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SnapshotError::io(index_file, e)),
        }
    }

    fn load(&self) -> SnapshotResult<StagedFiles> {
        let index_file = self.layout.index_file();
        let content = match fs::read_to_string(&index_file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StagedFiles::default()),
            Err(e) => return Err(SnapshotError::io(index_file, e)),
        };

        Ok(content
            .lines()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}
