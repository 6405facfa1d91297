use std::sync::Arc;

use account_store::{AccountService, PostgresAccountRepository};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Account Store admin CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database URL (falls back to DATABASE_URL)
    #[arg(short, long)]
    database_url: Option<String>,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the accounts table if it does not exist
    InitDb,

    /// Administratively credit funds to an account
    Credit {
        /// Account ID
        #[arg(short, long)]
        id: i64,

        /// Amount in minor currency units
        #[arg(short, long)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "account_store={}",
            cli.log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let repo = PostgresAccountRepository::new(cli.database_url).await?;

    match cli.command {
        Commands::InitDb => {
            repo.init_schema().await?;
            info!("Schema initialized");
        }
        Commands::Credit { id, amount } => {
            let service = AccountService::with_repo(Arc::new(repo));
            let account = service.credit(id, amount).await?;
            info!(
                "Credited {} to account {}; new balance {}",
                amount, account.id, account.balance
            );
        }
    }

    Ok(())
}
