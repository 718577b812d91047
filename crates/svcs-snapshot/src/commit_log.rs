//! Append-only commit history.
//!
//! One line per commit, oldest first: `<hash> <author> <message>`. The message
//! is the remainder of the line. File lists are not part of the line format;
//! they come from the snapshot manifest in the [`CommitStore`].

use crate::error::{IoContext, SnapshotError, SnapshotResult};
use crate::{Commit, CommitStore, Digest, RepoLayout};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use tracing::{debug, warn};

/// Log fields as they appear on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogLine {
    hash: Digest,
    author: String,
    message: String,
}

impl LogLine {
    fn parse(line: &str, line_no: usize) -> SnapshotResult<Self> {
        let mut fields = line.splitn(3, ' ');
        let (Some(hash), Some(author), Some(message)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(SnapshotError::corrupted(format!(
                "log line {line_no} has fewer than three fields"
            )));
        };

        let hash = Digest::parse(hash).map_err(|_| {
            SnapshotError::corrupted(format!("log line {line_no} has an invalid hash"))
        })?;

        Ok(Self {
            hash,
            author: author.to_string(),
            message: message.to_string(),
        })
    }
}

/// The ordered record of commits.
#[derive(Debug, Clone)]
pub struct CommitLog {
    layout: RepoLayout,
    store: CommitStore,
}

impl CommitLog {
    /// Create a log. `store` supplies each commit's file list.
    pub fn new(layout: RepoLayout, store: CommitStore) -> Self {
        Self { layout, store }
    }

    /// Append `commit` after the last entry.
    pub fn append(&self, commit: &Commit) -> SnapshotResult<()> {
        validate_author(&commit.author)?;
        validate_message(&commit.message)?;

        let log_file = self.layout.log_file();
        fs::create_dir_all(self.layout.metadata_dir()).at(self.layout.metadata_dir())?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .at(&log_file)?;
        let line = format!("{} {} {}\n", commit.hash, commit.author, commit.message);
        file.write_all(line.as_bytes()).at(&log_file)?;
        file.sync_all().at(&log_file)?;

        debug!(hash = %commit.hash, "Appended commit to log");
        Ok(())
    }

    /// All commits, most recent first.
    pub fn all(&self) -> SnapshotResult<Vec<Commit>> {
        let mut commits = self
            .read_lines()?
            .into_iter()
            .map(|line| self.hydrate(line))
            .collect::<SnapshotResult<Vec<_>>>()?;
        commits.reverse();
        Ok(commits)
    }

    /// The first commit, in chronological order, whose hash is `hash`.
    pub fn find(&self, hash: &Digest) -> SnapshotResult<Option<Commit>> {
        self.read_lines()?
            .into_iter()
            .find(|line| &line.hash == hash)
            .map(|line| self.hydrate(line))
            .transpose()
    }

    /// Whether any entry carries `hash`.
    pub fn contains(&self, hash: &Digest) -> SnapshotResult<bool> {
        Ok(self.read_lines()?.iter().any(|line| &line.hash == hash))
    }

    /// Every hash that appears in the log.
    pub fn hashes(&self) -> SnapshotResult<HashSet<Digest>> {
        Ok(self.read_lines()?.into_iter().map(|line| line.hash).collect())
    }

    fn read_lines(&self) -> SnapshotResult<Vec<LogLine>> {
        let log_file = self.layout.log_file();
        let content = match fs::read_to_string(&log_file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::io(log_file, e)),
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(i, line)| LogLine::parse(line, i + 1))
            .collect()
    }

    fn hydrate(&self, line: LogLine) -> SnapshotResult<Commit> {
        let files = match self.store.manifest(&line.hash)? {
            Some(files) => files,
            None => {
                warn!(hash = %line.hash, "Commit has no stored manifest");
                Vec::new()
            }
        };
        Ok(Commit::new(line.hash, line.author, line.message, files))
    }
}

/// Authors are one field of a space-separated line.
pub(crate) fn validate_author(author: &str) -> SnapshotResult<()> {
    if author.is_empty() {
        return Err(SnapshotError::MissingIdentity);
    }
    if author.chars().any(char::is_whitespace) {
        return Err(SnapshotError::validation(format!(
            "Author name '{author}' must not contain whitespace"
        )));
    }
    Ok(())
}

/// Messages are the tail of one line.
pub(crate) fn validate_message(message: &str) -> SnapshotResult<()> {
    if message.trim().is_empty() {
        return Err(SnapshotError::validation("Message was not passed."));
    }
    if message.contains(['\n', '\r']) {
        return Err(SnapshotError::validation("Message must be a single line."));
    }
    Ok(())
}
