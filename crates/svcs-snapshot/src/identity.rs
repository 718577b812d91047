//! Author identity.
//!
//! A single-line file holding the configured username.

use crate::commit_log::validate_author;
use crate::error::{IoContext, SnapshotError, SnapshotResult};
use crate::RepoLayout;
use std::fs;
use std::io::ErrorKind;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct IdentityStore {
    layout: RepoLayout,
}

impl IdentityStore {
    pub fn new(layout: RepoLayout) -> Self {
        Self { layout }
    }

    /// The configured author, if any.
    pub fn get(&self) -> SnapshotResult<Option<String>> {
        let path = self.layout.identity_file();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SnapshotError::io(path, e)),
        };

        Ok(content
            .lines()
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string))
    }

    /// The configured author, or [`SnapshotError::MissingIdentity`].
    pub fn require(&self) -> SnapshotResult<String> {
        self.get()?.ok_or(SnapshotError::MissingIdentity)
    }

    /// Replace the configured author.
    pub fn set(&self, name: &str) -> SnapshotResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SnapshotError::validation("Username must not be empty."));
        }
        validate_author(name)?;

        fs::create_dir_all(self.layout.metadata_dir()).at(self.layout.metadata_dir())?;
        let path = self.layout.identity_file();
        fs::write(&path, name).at(&path)?;
        debug!(name, "Configured identity");
        Ok(())
    }
}
