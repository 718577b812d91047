//! Testing utilities and fixtures for svcs.
//!
//! # Example Usage
//!
//! ```rust
//! use svcs_test_utils::fixtures::TestProject;
//!
//! let project = TestProject::new()
//!     .with_file("a.txt", "hello")
//!     .with_file("src/lib.rs", "pub fn f() {}")
//!     .build();
//!
//! assert_eq!(project.read_file("a.txt"), "hello");
//! ```

pub mod fixtures;

pub use fixtures::{BuiltTestProject, TestProject};
