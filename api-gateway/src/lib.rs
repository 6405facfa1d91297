// api-gateway/src/lib.rs
pub mod api;
pub mod auth;
pub mod config;
pub mod error;

use std::sync::Arc;

use account_store::AccountService;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use token_service::TokenService;
use transfer_engine::TransferEngine;

use crate::api::account::{create_account, credit, delete_account, get_account, list_accounts};
use crate::api::transfer::transfer;
use crate::auth::require_token;

/// App state shared across handlers
pub struct AppState {
    /// Account store
    pub account_service: Arc<AccountService>,
    /// Transfer engine
    pub transfer_engine: Arc<TransferEngine>,
    /// Identity token service
    pub token_service: Arc<TokenService>,
}

/// Build the application router
///
/// Account creation is the only unauthenticated entry point; every other
/// route passes the access guard first.
pub fn app(state: Arc<AppState>) -> Router {
    let public = Router::new().route("/account", post(create_account));

    let protected = Router::new()
        .route("/account", get(list_accounts))
        .route("/account/:id", get(get_account).delete(delete_account))
        .route("/account/:id/credit", post(credit))
        .route("/transfer", post(transfer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new().merge(public).merge(protected).with_state(state)
}
