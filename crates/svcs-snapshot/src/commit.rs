//! Commit data structures.

use crate::Digest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A committed snapshot of the staged files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Digest of the staged files' content, in staging order.
    pub hash: Digest,

    /// Name of the configured author.
    pub author: String,

    /// Commit message (single line).
    pub message: String,

    /// Files included in this commit (relative paths, staging order).
    pub files: Vec<PathBuf>,
}

impl Commit {
    /// Create a new commit record.
    pub fn new(
        hash: Digest,
        author: impl Into<String>,
        message: impl Into<String>,
        files: Vec<PathBuf>,
    ) -> Self {
        Self {
            hash,
            author: author.into(),
            message: message.into(),
            files,
        }
    }
}

impl std::fmt::Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "commit {}", self.hash)?;
        writeln!(f, "Author: {}", self.author)?;
        write!(f, "{}", self.message)
    }
}
