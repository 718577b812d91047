//! Test fixtures for creating reproducible work trees.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary work tree with configurable file structure.
///
/// Files are created in insertion order when [`TestProject::build`] is
/// called. The directory is removed when the built project is dropped.
pub struct TestProject {
    /// The temporary directory backing this project.
    temp_dir: TempDir,
    /// Files to create (path relative to root, contents).
    files: Vec<(PathBuf, Vec<u8>)>,
    /// Author name to pre-configure, if any.
    author: Option<String>,
}

impl TestProject {
    /// Create a new test project builder.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            files: Vec::new(),
            author: None,
        }
    }

    /// Add a file to the project.
    ///
    /// The path should be relative to the project root.
    /// Parent directories are created automatically.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), contents.as_ref().to_vec()));
        self
    }

    /// Pre-configure the author identity in the default metadata directory.
    pub fn with_author(mut self, name: impl Into<String>) -> Self {
        self.author = Some(name.into());
        self
    }

    /// Build the project, creating all files on disk.
    pub fn build(self) -> BuiltTestProject {
        let project = BuiltTestProject {
            temp_dir: self.temp_dir,
        };

        for (path, contents) in &self.files {
            project.write_file(path, contents);
        }
        if let Some(author) = &self.author {
            project.write_file("vcs/config.txt", author);
        }

        project
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// A built test project with files created on disk.
pub struct BuiltTestProject {
    temp_dir: TempDir,
}

impl BuiltTestProject {
    /// Get the path to the project root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file from the project as UTF-8.
    pub fn read_file(&self, path: impl AsRef<Path>) -> String {
        let full_path = self.path().join(path.as_ref());
        fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", full_path.display(), e))
    }

    /// Read a file from the project as raw bytes.
    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Vec<u8> {
        let full_path = self.path().join(path.as_ref());
        fs::read(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", full_path.display(), e))
    }

    /// Check if a file exists in the project.
    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.path().join(path.as_ref()).exists()
    }

    /// Write a file to the project (for modifying during tests).
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let full_path = self.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!(
                    "Failed to create parent directory for {}: {}",
                    full_path.display(),
                    e
                )
            });
        }
        fs::write(&full_path, contents.as_ref())
            .unwrap_or_else(|e| panic!("Failed to write file {}: {}", full_path.display(), e));
    }

    /// Delete a file from the project.
    pub fn delete_file(&self, path: impl AsRef<Path>) {
        let full_path = self.path().join(path.as_ref());
        fs::remove_file(&full_path)
            .unwrap_or_else(|e| panic!("Failed to delete file {}: {}", full_path.display(), e));
    }

    /// Number of non-empty lines in a text file, 0 if it doesn't exist.
    pub fn line_count(&self, path: impl AsRef<Path>) -> usize {
        let full_path = self.path().join(path.as_ref());
        fs::read_to_string(full_path)
            .map(|s| s.lines().filter(|l| !l.is_empty()).count())
            .unwrap_or(0)
    }

    /// Directories directly under `dir` (names only), sorted.
    pub fn list_dirs(&self, dir: impl AsRef<Path>) -> Vec<String> {
        let full_path = self.path().join(dir.as_ref());
        let Ok(entries) = fs::read_dir(&full_path) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_creates_nested_files() {
        let project = TestProject::new()
            .with_file("a.txt", "hello")
            .with_file("src/deep/mod.rs", "pub fn f() {}")
            .build();

        assert_eq!(project.read_file("a.txt"), "hello");
        assert!(project.file_exists("src/deep/mod.rs"));
        assert_eq!(project.list_dirs(""), vec!["src".to_string()]);
    }

    #[test]
    fn test_with_author_writes_identity_file() {
        let project = TestProject::new().with_author("alice").build();
        assert_eq!(project.read_file("vcs/config.txt"), "alice");
    }

    #[test]
    fn test_line_count() {
        let project = TestProject::new()
            .with_file("index.txt", "a\nb\n\n")
            .build();
        assert_eq!(project.line_count("index.txt"), 2);
        assert_eq!(project.line_count("missing.txt"), 0);
    }
}
