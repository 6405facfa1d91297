//! Account store for managing bank accounts and their balances

pub mod config;
pub mod repository;
pub mod service;

pub use config::AccountStoreConfig;
pub use repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};
pub use service::AccountService;
pub use service::RepositoryType;
