//! Snapshot engine.
//!
//! Orchestrates the components for one command. A commit runs
//! stage → hash → store → log → clear stage; the log entry is written only
//! after the snapshot is fully stored, and staging is cleared only after the
//! log entry is written.

use crate::commit_log::{validate_author, validate_message};
use crate::error::{IoContext, SnapshotError, SnapshotResult};
use crate::{
    AddOutcome, Commit, CommitLog, CommitStore, Digest, IdentityStore, RepoLayout,
    SnapshotHasher, StagingIndex,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of [`SnapshotEngine::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was stored and logged.
    Committed(Commit),
    /// Nothing staged, or the staged content is already stored.
    NothingToCommit,
}

impl std::fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Committed(commit) => {
                write!(f, "Changes are committed. [{}]", commit.hash)
            }
            Self::NothingToCommit => write!(f, "Nothing to commit."),
        }
    }
}

/// Result of [`SnapshotEngine::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub commit: Commit,
}

impl std::fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Switched to commit {}.", self.commit.hash)
    }
}

/// Commits, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History(pub Vec<Commit>);

impl History {
    pub fn commits(&self) -> &[Commit] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No commits yet.");
        }
        for (i, commit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }
            write!(f, "{commit}")?;
        }
        Ok(())
    }
}

/// Staged paths, in staging order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status(pub Vec<PathBuf>);

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "Add a file to the index.");
        }
        write!(f, "Tracked files:")?;
        for path in &self.0 {
            write!(f, "\n{}", path.display())?;
        }
        Ok(())
    }
}

/// Owns every component of one repository for the duration of a command.
#[derive(Debug, Clone)]
pub struct SnapshotEngine {
    layout: RepoLayout,
    index: StagingIndex,
    hasher: SnapshotHasher,
    store: CommitStore,
    log: CommitLog,
    identity: IdentityStore,
}

impl SnapshotEngine {
    /// Create an engine for the repository described by `layout`.
    ///
    /// Nothing is written until an operation needs it.
    pub fn new(layout: RepoLayout) -> Self {
        let store = CommitStore::new(layout.clone());
        Self {
            index: StagingIndex::new(layout.clone()),
            hasher: SnapshotHasher::new(layout.root()),
            log: CommitLog::new(layout.clone(), store.clone()),
            identity: IdentityStore::new(layout.clone()),
            store,
            layout,
        }
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    pub fn store(&self) -> &CommitStore {
        &self.store
    }

    pub fn log(&self) -> &CommitLog {
        &self.log
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    /// Stage a file for the next commit.
    pub fn add(&self, path: &Path) -> SnapshotResult<AddOutcome> {
        self.index.add(path)
    }

    /// Currently staged files.
    pub fn status(&self) -> SnapshotResult<Status> {
        Ok(Status(self.index.list()?))
    }

    /// Snapshot the staged files as the configured author.
    pub fn commit(&self, message: &str) -> SnapshotResult<CommitOutcome> {
        validate_message(message)?;

        let staged = self.index.list()?;
        if staged.is_empty() {
            debug!("Nothing staged");
            return Ok(CommitOutcome::NothingToCommit);
        }

        let author = self.identity.require()?;
        validate_author(&author)?;

        self.recover()?;

        let digest = self.hasher.compute_digest(&staged)?;
        if self.store.exists(&digest) {
            info!(hash = %digest, "Staged content already committed");
            return Ok(CommitOutcome::NothingToCommit);
        }

        self.store.save(&digest, &staged)?;

        let commit = Commit::new(digest, author, message, staged);
        if let Err(e) = self.log.append(&commit) {
            // A line that reached the log keeps its snapshot.
            if !matches!(self.log.contains(&commit.hash), Ok(true)) {
                if let Err(cleanup) = self.store.remove(&commit.hash) {
                    warn!(hash = %commit.hash, error = %cleanup, "Failed to remove unlogged snapshot");
                }
            }
            return Err(e);
        }

        self.index.clear()?;

        info!(
            "Committed {} ({} files) by {}",
            commit.hash,
            commit.files.len(),
            commit.author
        );
        Ok(CommitOutcome::Committed(commit))
    }

    /// Overwrite the working tree with the files of commit `hash`.
    ///
    /// Every stored file is read before anything in the working tree is
    /// touched, so a missing snapshot entry leaves the tree unchanged.
    pub fn restore(&self, hash: &str) -> SnapshotResult<RestoreOutcome> {
        let digest = Digest::parse(hash)?;
        let commit = self
            .log
            .find(&digest)?
            .ok_or_else(|| SnapshotError::CommitNotFound(digest.to_string()))?;

        if commit.files.is_empty() {
            return Err(SnapshotError::corrupted(format!(
                "commit {} has no stored file list",
                commit.hash
            )));
        }

        let mut contents = Vec::with_capacity(commit.files.len());
        for file in &commit.files {
            let bytes = self.store.read(&commit.hash, file)?;
            contents.push((self.layout.work_path(file)?, bytes));
        }

        for (dst, bytes) in &contents {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent).at(parent)?;
            }
            fs::write(dst, bytes).at(dst)?;
            debug!("Restored: {:?}", dst);
        }

        info!(
            "Restored commit {} ({} files)",
            commit.hash,
            commit.files.len()
        );
        Ok(RestoreOutcome { commit })
    }

    /// Commit history, most recent first.
    pub fn history(&self) -> SnapshotResult<History> {
        Ok(History(self.log.all()?))
    }

    /// Drop snapshots left behind by an interrupted commit.
    ///
    /// Removes temporary containers and any stored snapshot whose digest is
    /// not in the log. Returns the number of entries removed.
    pub fn recover(&self) -> SnapshotResult<usize> {
        let mut removed = self.store.sweep_temp()?;

        let logged = self.log.hashes()?;
        for digest in self.store.digests()? {
            if !logged.contains(&digest) {
                warn!(hash = %digest, "Removing snapshot with no log entry");
                self.store.remove(&digest)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
