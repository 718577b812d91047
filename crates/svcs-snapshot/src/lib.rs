//! Snapshot engine for svcs.
//!
//! This crate provides whole-tree versioning of a staged file set:
//! - Staging files for the next commit
//! - Content-addressed snapshots keyed by a SHA-256 digest
//! - An append-only commit log
//! - Restoring the working tree to a logged commit
//!
//! # Example
//!
//! ```no_run
//! use svcs_snapshot::{CommitOutcome, RepoLayout, SnapshotEngine};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = SnapshotEngine::new(RepoLayout::new("/project/root"));
//! engine.identity().set("alice")?;
//!
//! engine.add(Path::new("src/main.rs"))?;
//! if let CommitOutcome::Committed(commit) = engine.commit("Before edit")? {
//!     // ... edit the file ...
//!
//!     // Restore if needed
//!     engine.restore(commit.hash.as_str())?;
//! }
//! # Ok(())
//! # }
//! ```

mod commit;
mod commit_log;
mod digest;
mod engine;
mod error;
mod identity;
mod index;
mod layout;
mod store;

pub use commit::Commit;
pub use commit_log::CommitLog;
pub use digest::{Digest, SnapshotHasher, DIGEST_HEX_LEN};
pub use engine::{CommitOutcome, History, RestoreOutcome, SnapshotEngine, Status};
pub use error::{ErrorKind, SnapshotError, SnapshotResult};
pub use identity::IdentityStore;
pub use index::{AddOutcome, StagedFiles, StagingIndex};
pub use layout::{RepoLayout, DEFAULT_METADATA_DIR, METADATA_DIR_ENV};
pub use store::CommitStore;
