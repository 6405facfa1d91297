//! Transfer API handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use common::model::account::TransferResult;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::response::ApiResponse;
use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::AppState;

/// Transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Account to debit
    pub from_id: i64,
    /// Account to credit
    pub to_id: i64,
    /// Amount in minor currency units
    pub amount: i64,
}

/// Transfer funds between two accounts
///
/// The acting identity must own the debited account. Either both legs
/// complete or the net effect is zero.
#[utoipa::path(
    post,
    path = "/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed"),
        (status = 400, description = "Invalid transfer or insufficient funds"),
        (status = 403, description = "Missing token or source account not owned by caller"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Transfer failed and was compensated")
    ),
    tag = "transfer"
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Extension(AuthAccount(caller)): Extension<AuthAccount>,
    Json(request): Json<TransferRequest>,
) -> Result<ApiResponse<TransferResult>, ApiError> {
    if caller != request.from_id {
        return Err(ApiError::Forbidden(format!(
            "account {} is not owned by the caller",
            request.from_id
        )));
    }

    let result = state
        .transfer_engine
        .transfer(request.from_id, request.to_id, request.amount)
        .await
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(result))
}
