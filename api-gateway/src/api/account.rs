//! Account API handlers
//!
//! Handles endpoints related to account management:
//! - Create account (the only unauthenticated entry point)
//! - Get account details
//! - List accounts
//! - Delete account
//! - Administrative credit

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use common::model::account::Account;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::response::{ApiListResponse, ApiResponse};
use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::AppState;

/// Create account request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
}

/// Create account response: the new account plus a freshly issued token
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAccountResponse {
    /// The created account
    pub account: Account,
    /// Identity token for the new account
    pub token: String,
}

/// Delete account response
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteAccountResponse {
    /// ID of the deleted account
    pub id: i64,
}

/// Credit request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreditRequest {
    /// Amount in minor currency units
    pub amount: i64,
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/account",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account successfully created"),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<ApiResponse<CreateAccountResponse>, ApiError> {
    let account = state
        .account_service
        .create_account(&request.first_name, &request.last_name)
        .await
        .map_err(ApiError::Common)?;

    let token = state
        .token_service
        .issue(account.id)
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(CreateAccountResponse { account, token }))
}

/// Get an account by ID
#[utoipa::path(
    get,
    path = "/account/{id}",
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account details retrieved successfully"),
        (status = 403, description = "Missing or invalid token"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Account>, ApiError> {
    let account = state
        .account_service
        .get_account(id)
        .await
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(account))
}

/// List all accounts
#[utoipa::path(
    get,
    path = "/account",
    responses(
        (status = 200, description = "Accounts retrieved successfully"),
        (status = 403, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<ApiListResponse<Account>, ApiError> {
    let accounts = state
        .account_service
        .list_accounts()
        .await
        .map_err(ApiError::Common)?;

    Ok(ApiListResponse::new(accounts))
}

/// Delete an account
///
/// The acting identity must own the account being deleted.
#[utoipa::path(
    delete,
    path = "/account/{id}",
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account deleted successfully"),
        (status = 403, description = "Missing token or account not owned by caller"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(AuthAccount(caller)): Extension<AuthAccount>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<DeleteAccountResponse>, ApiError> {
    if caller != id {
        return Err(ApiError::Forbidden(format!(
            "account {} is not owned by the caller",
            id
        )));
    }

    state
        .account_service
        .delete_account(id)
        .await
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(DeleteAccountResponse { id }))
}

/// Administratively credit funds to an account
///
/// The acting identity must own the credited account.
#[utoipa::path(
    post,
    path = "/account/{id}/credit",
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    request_body = CreditRequest,
    responses(
        (status = 200, description = "Funds credited successfully"),
        (status = 400, description = "Invalid credit amount"),
        (status = 403, description = "Missing token or account not owned by caller"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn credit(
    State(state): State<Arc<AppState>>,
    Extension(AuthAccount(caller)): Extension<AuthAccount>,
    Path(id): Path<i64>,
    Json(request): Json<CreditRequest>,
) -> Result<ApiResponse<Account>, ApiError> {
    if caller != id {
        return Err(ApiError::Forbidden(format!(
            "account {} is not owned by the caller",
            id
        )));
    }

    let account = state
        .account_service
        .credit(id, request.amount)
        .await
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(account))
}
