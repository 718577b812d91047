//! Shared utilities for svcs.
//!
//! This crate provides common utilities used across the svcs workspace:
//! - Logging setup with tracing
//! - Path normalization and containment checks

pub mod log;
pub mod path;
