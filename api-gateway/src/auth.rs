//! Access guard
//!
//! Request-level policy deciding whether a caller may reach business logic.
//! Every route except account creation requires a token in the
//! `x-auth-token` header; the resolved account id is attached to the request
//! for downstream ownership checks. Tokens are not single-use and each
//! request is judged independently.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the identity token
pub const AUTH_HEADER: &str = "x-auth-token";

/// Identity resolved by the access guard, available to handlers via
/// request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthAccount(pub i64);

/// Middleware admitting only requests that present a valid token
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::InvalidToken)?;

    // The failure detail is logged, never returned; missing, malformed and
    // expired tokens all produce the same rejection
    let account_id = state.token_service.validate(token).map_err(|e| {
        debug!("Rejecting request: {}", e);
        ApiError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthAccount(account_id));
    Ok(next.run(request).await)
}
