//! Identity token service
//!
//! Issues and validates the signed, time-bounded tokens that assert an
//! account id. Tokens are stateless JWTs: nothing is persisted server-side,
//! and the signing secret is process-wide, read-only after startup.

pub mod config;
pub mod service;

pub use config::TokenConfig;
pub use service::TokenService;
