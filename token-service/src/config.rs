//! Configuration for the token service

use std::env;

use chrono::Duration;
use common::error::{Error, Result};

/// Default token lifetime in days
const DEFAULT_LIFETIME_DAYS: i64 = 14;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Token lifetime
    pub lifetime: Duration,
}

impl TokenConfig {
    /// Create a new configuration from environment variables
    ///
    /// The absence of a signing secret is a fatal startup condition, never
    /// a per-request error.
    pub fn from_env() -> Result<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| Error::ConfigurationError("JWT_SECRET must be set".to_string()))?;
        if secret.is_empty() {
            return Err(Error::ConfigurationError(
                "JWT_SECRET must be non-empty".to_string(),
            ));
        }

        let lifetime_days = env::var("TOKEN_LIFETIME_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_LIFETIME_DAYS);

        Ok(Self {
            secret,
            lifetime: Duration::days(lifetime_days),
        })
    }

    /// Create a new configuration with custom values
    pub fn new(secret: String, lifetime: Duration) -> Self {
        Self { secret, lifetime }
    }
}
