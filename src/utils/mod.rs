//! Shared utilities
//!
//! Crate-level error type and logging bootstrap.

pub mod error;
pub mod logging;
