//! Snapshot error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Broad classification of a [`SnapshotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing argument. The caller can fix the input and retry.
    Validation,
    /// The repository is not in a state that allows the operation.
    State,
    /// Low-level storage failure; the current operation was aborted.
    Storage,
}

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Invalid or missing argument.
    #[error("{0}")]
    Validation(String),

    /// Staged path does not exist or is not a regular file.
    #[error("Can't find '{}'.", .0.display())]
    PathNotFound(PathBuf),

    /// Invalid commit hash.
    #[error("Invalid commit hash: {0}")]
    InvalidHash(String),

    /// No author identity configured.
    #[error("Please, tell me who you are.")]
    MissingIdentity,

    /// Commit hash is not in the log.
    #[error("Commit does not exist.")]
    CommitNotFound(String),

    /// Operation not allowed in the current repository state.
    #[error("{0}")]
    State(String),

    /// Stored snapshot entry not found.
    #[error("Snapshot entry not found: {hash}/{}", .path.display())]
    NotFound { hash: String, path: PathBuf },

    /// IO error with the path that caused it.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Repository metadata is corrupted.
    #[error("Repository corrupted: {0}")]
    Corrupted(String),
}

impl SnapshotError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a state error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Create an IO error tagged with the path being accessed.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::PathNotFound(_) | Self::InvalidHash(_) => {
                ErrorKind::Validation
            }
            Self::MissingIdentity | Self::CommitNotFound(_) | Self::State(_) => ErrorKind::State,
            Self::NotFound { .. } | Self::Io { .. } | Self::Serialization(_) | Self::Corrupted(_) => {
                ErrorKind::Storage
            }
        }
    }

    /// Whether the error aborted the operation because storage failed.
    ///
    /// Validation and state errors are reported to the user and the process
    /// carries on.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}

/// Attach a path to an `io::Result`.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl AsRef<Path>) -> SnapshotResult<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> SnapshotResult<T> {
        self.map_err(|e| SnapshotError::io(path, e))
    }
}
