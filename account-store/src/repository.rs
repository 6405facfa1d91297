//! Repository for account data

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use common::error::{Error, Result};
use common::model::account::Account;
use dashmap::{DashMap, DashSet};
use rand::Rng;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{debug, info};

/// Attempts made to allocate an unused account number before giving up
const NUMBER_ALLOC_ATTEMPTS: usize = 5;

/// Generate a candidate external account number
fn random_account_number() -> i64 {
    rand::thread_rng().gen_range(10_000_000..100_000_000)
}

/// Account repository trait defining the interface for account data storage
///
/// `adjust_balance` calls targeting the same account id are serialized by
/// every implementation; the balance never goes below zero and no update is
/// lost under concurrent callers.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a new account with a zero balance and a unique account number
    async fn create_account(&self, first_name: &str, last_name: &str) -> Result<Account>;

    /// Get an account by ID
    async fn get_account(&self, id: i64) -> Result<Option<Account>>;

    /// List all accounts in creation order
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Delete an account by ID, returning whether a record was removed
    async fn delete_account(&self, id: i64) -> Result<bool>;

    /// Apply `balance += delta`, atomically per account id
    ///
    /// Fails with `InsufficientFunds` when the result would be negative and
    /// with `AccountNotFound` when no record matches. Returns the updated
    /// account.
    async fn adjust_balance(&self, id: i64, delta: i64) -> Result<Account>;
}

/// In-memory repository for account data
pub struct InMemoryAccountRepository {
    /// Accounts by ID
    accounts: DashMap<i64, Account>,
    /// Reserved account numbers
    numbers: DashSet<i64>,
    /// Next account ID to assign
    next_id: AtomicI64,
}

impl InMemoryAccountRepository {
    /// Create a new in-memory account repository
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            numbers: DashSet::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, first_name: &str, last_name: &str) -> Result<Account> {
        let number = {
            let mut allocated = None;
            for _ in 0..NUMBER_ALLOC_ATTEMPTS {
                let candidate = random_account_number();
                // insert returns true when the number was not yet reserved
                if self.numbers.insert(candidate) {
                    allocated = Some(candidate);
                    break;
                }
            }
            allocated.ok_or_else(|| {
                Error::Internal("could not allocate a unique account number".to_string())
            })?
        };

        let account = Account {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            number,
            balance: 0,
            created_at: Utc::now(),
        };

        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; creation order is by id
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn delete_account(&self, id: i64) -> Result<bool> {
        match self.accounts.remove(&id) {
            Some((_, account)) => {
                self.numbers.remove(&account.number);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn adjust_balance(&self, id: i64, delta: i64) -> Result<Account> {
        // The entry guard serializes concurrent adjustments of the same id
        match self.accounts.get_mut(&id) {
            Some(mut entry) => {
                let next = entry.balance.checked_add(delta).ok_or_else(|| {
                    Error::Internal(format!("balance overflow for account {}", id))
                })?;
                if next < 0 {
                    return Err(Error::InsufficientFunds(format!(
                        "account {} holds {}, cannot apply {}",
                        id, entry.balance, delta
                    )));
                }
                entry.balance = next;
                Ok(entry.clone())
            }
            None => Err(Error::AccountNotFound(format!("Account not found: {}", id))),
        }
    }
}

/// PostgreSQL repository for account data
pub struct PostgresAccountRepository {
    /// Database connection pool
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a new PostgreSQL account repository
    pub async fn new(database_url: Option<String>) -> Result<Self> {
        let database_url = match database_url {
            Some(url) => url,
            None => std::env::var("DATABASE_URL")
                .map_err(|_| Error::ConfigurationError("DATABASE_URL must be set".to_string()))?,
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .map_err(Error::Database)?;

        info!("Connected to PostgreSQL database");

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL account repository with configuration
    pub async fn with_config(config: &crate::config::AccountStoreConfig) -> Result<Self> {
        info!(
            "Connecting to PostgreSQL database with pool size: {}",
            config.db_pool_size
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.db_pool_size)
            .connect(&config.database_url)
            .await
            .map_err(Error::Database)?;

        info!("Connected to PostgreSQL database");

        Ok(Self { pool })
    }

    /// Create the accounts table if it does not exist yet
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS accounts (
                id         BIGSERIAL PRIMARY KEY,
                first_name VARCHAR(50) NOT NULL,
                last_name  VARCHAR(50) NOT NULL,
                number     BIGINT NOT NULL UNIQUE,
                balance    BIGINT NOT NULL DEFAULT 0 CHECK (balance >= 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Convert a database row into an account record
fn row_to_account(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        number: row.get("number"),
        balance: row.get("balance"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create_account(&self, first_name: &str, last_name: &str) -> Result<Account> {
        debug!("Creating new account in database");

        // The UNIQUE constraint on `number` is the authority; retry a few
        // times rather than silently accepting a collision
        for _ in 0..NUMBER_ALLOC_ATTEMPTS {
            let number = random_account_number();

            let result = sqlx::query(
                "INSERT INTO accounts (first_name, last_name, number)
                 VALUES ($1, $2, $3)
                 RETURNING id, first_name, last_name, number, balance, created_at",
            )
            .bind(first_name)
            .bind(last_name)
            .bind(number)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(row) => return Ok(row_to_account(&row)),
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    debug!("Account number {} already taken, retrying", number);
                    continue;
                }
                Err(e) => return Err(Error::Database(e)),
            }
        }

        Err(Error::Internal(
            "could not allocate a unique account number".to_string(),
        ))
    }

    async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        debug!("Getting account from database: {}", id);

        let row = sqlx::query(
            "SELECT id, first_name, last_name, number, balance, created_at
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_account))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        debug!("Listing all accounts");

        let rows = sqlx::query(
            "SELECT id, first_name, last_name, number, balance, created_at
             FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_account).collect())
    }

    async fn delete_account(&self, id: i64) -> Result<bool> {
        debug!("Deleting account from database: {}", id);

        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_balance(&self, id: i64, delta: i64) -> Result<Account> {
        debug!("Adjusting balance of account {} by {}", id, delta);

        // A single conditional UPDATE is atomic per row, which is exactly the
        // per-key serialization the store contract requires
        let row = sqlx::query(
            "UPDATE accounts
             SET balance = balance + $2
             WHERE id = $1 AND balance + $2 >= 0
             RETURNING id, first_name, last_name, number, balance, created_at",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row_to_account(&row)),
            None => {
                // Zero rows means either the account is missing or the
                // balance check refused the delta; distinguish the two
                let exists = sqlx::query("SELECT 1 FROM accounts WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .is_some();

                if exists {
                    Err(Error::InsufficientFunds(format!(
                        "account {} cannot apply {}",
                        id, delta
                    )))
                } else {
                    Err(Error::AccountNotFound(format!("Account not found: {}", id)))
                }
            }
        }
    }
}
