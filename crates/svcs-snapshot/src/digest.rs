//! Content digests and the snapshot hasher.

use crate::error::{IoContext, SnapshotError, SnapshotResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hex-encoded SHA-256 digest identifying a snapshot.
///
/// Always 64 lowercase hex characters, so it is safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Parse a digest from its hex form.
    pub fn parse(s: &str) -> SnapshotResult<Self> {
        let s = s.trim();
        if s.len() != DIGEST_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SnapshotError::InvalidHash(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Digest of an in-memory byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Get the digest as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Digest {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Digest {
    type Error = SnapshotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Digest> for String {
    fn from(value: Digest) -> Self {
        value.0
    }
}

/// Derives one digest from the content of an ordered list of files.
///
/// Every file is streamed into a single SHA-256 accumulator in the order
/// given, so the same files staged in a different order hash differently.
#[derive(Debug, Clone)]
pub struct SnapshotHasher {
    root: PathBuf,
}

impl SnapshotHasher {
    /// Create a hasher resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Hash the files at `paths`, in order.
    ///
    /// Fails on the first unreadable file; no partial digest is returned.
    pub fn compute_digest(&self, paths: &[PathBuf]) -> SnapshotResult<Digest> {
        let mut hasher = Sha256::new();

        for path in paths {
            let full = self.root.join(path);
            let file = File::open(&full).at(&full)?;
            let bytes = io::copy(&mut BufReader::new(file), &mut hasher).at(&full)?;
            debug!(path = %path.display(), bytes, "Hashed file");
        }

        Ok(Digest(hex::encode(hasher.finalize())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // sha256("hello")
    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_digest_of_single_file_matches_sha256() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let hasher = SnapshotHasher::new(dir.path());
        let digest = hasher.compute_digest(&[PathBuf::from("a.txt")]).unwrap();
        assert_eq!(digest.as_str(), HELLO);
        assert_eq!(digest, Digest::of_bytes(b"hello"));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();

        let hasher = SnapshotHasher::new(dir.path());
        let paths = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
        let first = hasher.compute_digest(&paths).unwrap();
        let second = hasher.compute_digest(&paths).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_digest_is_cumulative_and_order_sensitive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();

        let hasher = SnapshotHasher::new(dir.path());
        let ab = hasher
            .compute_digest(&[PathBuf::from("a.txt"), PathBuf::from("b.txt")])
            .unwrap();
        let ba = hasher
            .compute_digest(&[PathBuf::from("b.txt"), PathBuf::from("a.txt")])
            .unwrap();

        assert_ne!(ab, ba);
        assert_eq!(ab, Digest::of_bytes(b"alphabeta"));
    }

    #[test]
    fn test_unreadable_file_aborts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();

        let hasher = SnapshotHasher::new(dir.path());
        let err = hasher
            .compute_digest(&[PathBuf::from("a.txt"), PathBuf::from("gone.txt")])
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("gone.txt"));
    }

    #[test]
    fn test_parse_digest() {
        let upper = HELLO.to_uppercase();
        assert_eq!(Digest::parse(&upper).unwrap().as_str(), HELLO);
        assert!(Digest::parse("abc").is_err());
        assert!(Digest::parse(&"g".repeat(64)).is_err());
        assert!(Digest::parse("../../../../etc/passwd").is_err());
    }

    #[test]
    fn test_serde_round_trips_through_string() {
        let digest = Digest::parse(HELLO).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{HELLO}\""));
        assert!(serde_json::from_str::<Digest>("\"nope\"").is_err());
    }
}
