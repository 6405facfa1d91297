//! API Gateway for the bank service

use std::sync::Arc;

use account_store::{AccountService, AccountStoreConfig};
use clap::Parser;
use dotenv::dotenv;
use token_service::TokenService;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};
use transfer_engine::TransferEngine;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_gateway::{api, app, config::AppConfig, AppState};

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        api::account::create_account,
        api::account::get_account,
        api::account::list_accounts,
        api::account::delete_account,
        api::account::credit,
        api::transfer::transfer,
    ),
    components(
        schemas(
            api::account::CreateAccountRequest,
            api::account::CreateAccountResponse,
            api::account::DeleteAccountResponse,
            api::account::CreditRequest,
            api::transfer::TransferRequest,
            common::model::account::Account,
            common::model::account::TransferResult,
            api::response::ApiResponse<common::model::account::Account>,
            api::response::ApiListResponse<common::model::account::Account>,
            api::response::ResponseMetadata,
        )
    ),
    tags(
        (name = "account", description = "Account management endpoints"),
        (name = "transfer", description = "Fund transfer endpoint")
    ),
    info(
        title = "Bank Service API",
        version = "1.0.0",
        description = "API for account management and inter-account fund transfers"
    )
)]
struct ApiDoc;

/// Bank API server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Listening address; defaults to 0.0.0.0 on the configured port
    #[clap(short, long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging with debug level when DEBUG=1 env var is set
    let env = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env == "1" { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("tower_http=debug,api_gateway=debug")
        .unwrap();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    debug!("Debug logging enabled");

    let config = AppConfig::new();

    // A missing signing secret is fatal here, before any request is served
    let token_service = Arc::new(TokenService::from_env()?);

    // Initialize the store; fall back to memory when no database is
    // configured (local runs and tests)
    let account_service = match config.database_url {
        Some(_) => {
            let store_config = AccountStoreConfig::from_env();
            Arc::new(AccountService::with_config(&store_config).await?)
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory account store");
            Arc::new(AccountService::new())
        }
    };

    let transfer_engine = Arc::new(TransferEngine::new(account_service.clone()));

    // Create app state
    let state = Arc::new(AppState {
        account_service,
        transfer_engine,
        token_service,
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Set up Swagger UI
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Combine all routes
    let router = app(state)
        .merge(swagger_ui)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(log_level))
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        );

    // Start the server
    let addr = args
        .addr
        .unwrap_or_else(|| format!("0.0.0.0:{}", config.port));
    let addr: std::net::SocketAddr = addr.parse().expect("Invalid address");
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    // Run until interrupt signal
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
