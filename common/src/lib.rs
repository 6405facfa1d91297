//! Common types for the bank service
//!
//! This library contains the shared error taxonomy and domain models used
//! across all crates in the workspace. Every service crate returns the same
//! `Error`/`Result` pair so that failures cross crate boundaries as typed
//! values, never as panics.

pub mod error;
pub mod model;

/// Re-export important types
pub use error::{Error, ErrorExt, Result};

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
