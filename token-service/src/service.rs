//! Token issue and validation

use chrono::{Duration, Utc};
use common::error::{Error, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Claims embedded in an identity token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Owning account id
    sub: i64,
    /// Issued-at, seconds since the epoch
    iat: i64,
    /// Expiration instant, seconds since the epoch
    exp: i64,
}

/// Service issuing and validating identity tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    /// Create a new token service from a configuration
    pub fn new(config: &crate::config::TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            lifetime: config.lifetime,
        }
    }

    /// Create a new token service configured from the environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&crate::config::TokenConfig::from_env()?))
    }

    /// Issue a signed token asserting `account_id`, with the configured
    /// lifetime
    pub fn issue(&self, account_id: i64) -> Result<String> {
        self.issue_with_lifetime(account_id, self.lifetime)
    }

    /// Issue a signed token with an explicit lifetime
    pub fn issue_with_lifetime(&self, account_id: i64, lifetime: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("failed to sign token: {}", e)))
    }

    /// Validate a token, returning the embedded account id
    ///
    /// The algorithm is pinned to HS256; a token signed any other way fails
    /// as invalid. Callers must not trust any identity claim from the
    /// request other than the returned id.
    pub fn validate(&self, token: &str) -> Result<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => {
                debug!("Token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(Error::TokenExpired(
                        "token is past its expiration instant".to_string(),
                    )),
                    _ => Err(Error::InvalidToken(e.to_string())),
                }
            }
        }
    }
}
