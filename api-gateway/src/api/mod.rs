//! API handlers
//!
//! This module contains all the API endpoint handlers organized by resource.
//! Each handler follows a consistent pattern:
//! - Extract state, identity and parameters using Axum extractors
//! - Check ownership where the operation mutates an account
//! - Call the appropriate service methods
//! - Map the result to a standardized response format

pub mod account;
pub mod response;
pub mod transfer;

// Re-export the response module for easy access
pub use response::{ApiListResponse, ApiResponse};
