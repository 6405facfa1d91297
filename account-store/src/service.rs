//! Account service implementation

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use common::error::{Error, ErrorExt, Result};
use common::model::account::Account;
use tokio::time::timeout;
use tracing::info;

use crate::repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};

/// Deadline applied to storage calls when no configuration is given
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Account service owning the authoritative balance values
///
/// The service is the only component that mutates balances; every storage
/// call is bounded by a deadline so callers can treat the backing medium as
/// potentially slow without hanging a request task.
pub struct AccountService {
    /// Repository for account data
    repo: Arc<dyn AccountRepository>,
    /// Deadline for a single storage call
    op_timeout: Duration,
}

/// Repository Type
pub enum RepositoryType {
    /// In-memory repository
    InMemory,
    /// PostgreSQL repository
    Postgres(Option<String>),
}

impl AccountService {
    /// Create a new account service backed by the in-memory repository
    pub fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryAccountRepository::new()),
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Create a new account service with a specific repository type
    pub async fn with_repository(repo_type: RepositoryType) -> Result<Self> {
        let repo: Arc<dyn AccountRepository> = match repo_type {
            RepositoryType::InMemory => Arc::new(InMemoryAccountRepository::new()),
            RepositoryType::Postgres(database_url) => {
                Arc::new(PostgresAccountRepository::new(database_url).await?)
            }
        };

        Ok(Self {
            repo,
            op_timeout: DEFAULT_OP_TIMEOUT,
        })
    }

    /// Create a new account service with a configuration
    pub async fn with_config(config: &crate::config::AccountStoreConfig) -> Result<Self> {
        let repo = PostgresAccountRepository::with_config(config).await?;
        repo.init_schema().await?;

        Ok(Self {
            repo: Arc::new(repo),
            op_timeout: config.op_timeout,
        })
    }

    /// Create a new account service over an existing repository
    pub fn with_repo(repo: Arc<dyn AccountRepository>) -> Self {
        Self::with_repo_and_timeout(repo, DEFAULT_OP_TIMEOUT)
    }

    /// Create a new account service over an existing repository with an
    /// explicit storage deadline
    pub fn with_repo_and_timeout(repo: Arc<dyn AccountRepository>, op_timeout: Duration) -> Self {
        Self { repo, op_timeout }
    }

    /// Bound a storage call with the configured deadline
    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = Result<T>> + Send) -> Result<T> {
        match timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::StorageTimeout(format!(
                "{} did not complete within {:?}",
                op, self.op_timeout
            ))),
        }
    }

    /// Create a new account with a zero balance
    pub async fn create_account(&self, first_name: &str, last_name: &str) -> Result<Account> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(Error::ValidationError(
                "first and last name must be non-empty".to_string(),
            ));
        }

        info!("Creating account for {} {}", first_name, last_name);
        self.bounded("create_account", self.repo.create_account(first_name, last_name))
            .await
    }

    /// Get an account by ID
    pub async fn get_account(&self, id: i64) -> Result<Account> {
        self.bounded("get_account", self.repo.get_account(id))
            .await
            .with_context(|| format!("Failed to retrieve account {}", id))?
            .ok_or_else(|| Error::AccountNotFound(format!("Account not found: {}", id)))
    }

    /// List all accounts in creation order
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.bounded("list_accounts", self.repo.list_accounts()).await
    }

    /// Delete an account by ID
    ///
    /// Deleting is not idempotent: a second delete of the same id fails
    /// with `AccountNotFound`.
    pub async fn delete_account(&self, id: i64) -> Result<()> {
        info!("Deleting account {}", id);

        let removed = self
            .bounded("delete_account", self.repo.delete_account(id))
            .await
            .with_context(|| format!("Failed to delete account {}", id))?;

        if removed {
            Ok(())
        } else {
            Err(Error::AccountNotFound(format!("Account not found: {}", id)))
        }
    }

    /// Apply `balance += delta` to one account, atomically per id
    pub async fn adjust_balance(&self, id: i64, delta: i64) -> Result<Account> {
        self.bounded("adjust_balance", self.repo.adjust_balance(id, delta))
            .await
    }

    /// Administrative credit of funds to an account
    pub async fn credit(&self, id: i64, amount: i64) -> Result<Account> {
        if amount <= 0 {
            return Err(Error::ValidationError(format!(
                "credit amount must be positive, got {}",
                amount
            )));
        }

        info!("Crediting {} to account {}", amount, id);
        self.adjust_balance(id, amount)
            .await
            .with_context(|| format!("Failed to credit account {}", id))
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}
