//! Repository layout.
//!
//! All on-disk locations are derived from one [`RepoLayout`], which is handed
//! to every component instead of being baked into constants:
//!
//! ```text
//! <root>/
//!   vcs/
//!     config.txt        # configured author
//!     index.txt         # staged paths, one per line
//!     log.txt           # "<hash> <author> <message>" per commit
//!     commits/
//!       <hash>/         # file copies at their relative paths
//!       <hash>.json     # ordered list of staged paths
//! ```

use crate::error::{SnapshotError, SnapshotResult};
use std::path::{Path, PathBuf};

/// Default name of the metadata directory under the work-tree root.
pub const DEFAULT_METADATA_DIR: &str = "vcs";

/// Environment variable overriding the metadata directory name.
pub const METADATA_DIR_ENV: &str = "SVCS_DIR";

/// Locations of a repository's work tree and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
    metadata_dir: PathBuf,
}

impl RepoLayout {
    /// Layout for a work tree at `root` with the default metadata directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let metadata_dir = root.join(DEFAULT_METADATA_DIR);
        Self { root, metadata_dir }
    }

    /// Layout honouring `SVCS_DIR` if it is set.
    pub fn from_env(root: impl Into<PathBuf>) -> SnapshotResult<Self> {
        let layout = Self::new(root);
        match std::env::var(METADATA_DIR_ENV) {
            Ok(name) if !name.trim().is_empty() => layout.with_metadata_dir(name.trim()),
            _ => Ok(layout),
        }
    }

    /// Use a different metadata directory name, relative to the root.
    pub fn with_metadata_dir(mut self, name: impl AsRef<Path>) -> SnapshotResult<Self> {
        let name = name.as_ref();
        let joined = svcs_util::path::safe_join(&self.root, name).ok_or_else(|| {
            SnapshotError::validation(format!(
                "Metadata directory {} must be inside the work tree",
                name.display()
            ))
        })?;
        self.metadata_dir = joined;
        Ok(self)
    }

    /// Work-tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metadata directory.
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    pub fn identity_file(&self) -> PathBuf {
        self.metadata_dir.join("config.txt")
    }

    pub fn index_file(&self) -> PathBuf {
        self.metadata_dir.join("index.txt")
    }

    pub fn log_file(&self) -> PathBuf {
        self.metadata_dir.join("log.txt")
    }

    pub fn commits_dir(&self) -> PathBuf {
        self.metadata_dir.join("commits")
    }

    /// Resolve a user-supplied path to a path relative to the work tree.
    ///
    /// Rejects paths outside the root and paths inside the metadata directory.
    pub fn relativize(&self, path: &Path) -> SnapshotResult<PathBuf> {
        let relative = svcs_util::path::relative_to(path, &self.root)
            .ok_or_else(|| SnapshotError::PathNotFound(path.to_path_buf()))?;

        let metadata = self
            .metadata_dir
            .strip_prefix(&self.root)
            .unwrap_or(&self.metadata_dir);
        if relative.starts_with(metadata) {
            return Err(SnapshotError::validation(format!(
                "'{}' is inside the repository metadata directory",
                path.display()
            )));
        }

        Ok(relative)
    }

    /// Absolute location of a work-tree-relative path.
    pub fn work_path(&self, relative: &Path) -> SnapshotResult<PathBuf> {
        svcs_util::path::safe_join(&self.root, relative).ok_or_else(|| {
            SnapshotError::corrupted(format!(
                "path {} escapes the work tree",
                relative.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let layout = RepoLayout::new("/work");
        assert_eq!(layout.metadata_dir(), Path::new("/work/vcs"));
        assert_eq!(layout.index_file(), PathBuf::from("/work/vcs/index.txt"));
        assert_eq!(layout.log_file(), PathBuf::from("/work/vcs/log.txt"));
        assert_eq!(layout.identity_file(), PathBuf::from("/work/vcs/config.txt"));
        assert_eq!(layout.commits_dir(), PathBuf::from("/work/vcs/commits"));
    }

    #[test]
    fn test_custom_metadata_dir() {
        let layout = RepoLayout::new("/work").with_metadata_dir(".svcs").unwrap();
        assert_eq!(layout.log_file(), PathBuf::from("/work/.svcs/log.txt"));

        assert!(RepoLayout::new("/work").with_metadata_dir("../elsewhere").is_err());
    }

    #[test]
    fn test_relativize() {
        let layout = RepoLayout::new("/work");
        assert_eq!(
            layout.relativize(Path::new("src/main.rs")).unwrap(),
            PathBuf::from("src/main.rs")
        );
        assert_eq!(
            layout.relativize(Path::new("/work/a.txt")).unwrap(),
            PathBuf::from("a.txt")
        );
        assert!(matches!(
            layout.relativize(Path::new("/other/a.txt")),
            Err(SnapshotError::PathNotFound(_))
        ));
        assert!(matches!(
            layout.relativize(Path::new("vcs/log.txt")),
            Err(SnapshotError::Validation(_))
        ));
    }

    #[test]
    fn test_work_path_rejects_traversal() {
        let layout = RepoLayout::new("/work");
        assert_eq!(
            layout.work_path(Path::new("a/b.txt")).unwrap(),
            PathBuf::from("/work/a/b.txt")
        );
        assert!(layout.work_path(Path::new("../x")).is_err());
    }
}
