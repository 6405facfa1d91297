use std::sync::Arc;
use std::time::Duration;

use account_store::{AccountRepository, AccountService, InMemoryAccountRepository, RepositoryType};
use async_trait::async_trait;
use common::error::{Error, Result};
use common::model::account::Account;

#[tokio::test]
async fn test_create_account() {
    let service = AccountService::new();

    let account = service.create_account("Ada", "Lovelace").await.unwrap();

    assert!(account.id > 0);
    assert_eq!(account.first_name, "Ada");
    assert_eq!(account.last_name, "Lovelace");
    assert_eq!(account.balance, 0);
    assert_eq!(
        account.created_at.date_naive(),
        chrono::Utc::now().date_naive()
    );

    // The stored record is identical to the returned one
    let retrieved = service.get_account(account.id).await.unwrap();
    assert_eq!(retrieved, account);
}

#[tokio::test]
async fn test_create_account_rejects_empty_names() {
    let service = AccountService::new();

    let result = service.create_account("", "Lovelace").await;
    match result {
        Err(Error::ValidationError(_)) => (),
        other => panic!("Expected ValidationError, got {:?}", other.map(|a| a.id)),
    }
}

#[tokio::test]
async fn test_account_numbers_are_unique() {
    let service = AccountService::with_repository(RepositoryType::InMemory)
        .await
        .unwrap();

    let mut numbers = std::collections::HashSet::new();
    for i in 0..50 {
        let account = service
            .create_account("Holder", &format!("Number{}", i))
            .await
            .unwrap();
        assert!(
            numbers.insert(account.number),
            "account number {} allocated twice",
            account.number
        );
    }
}

#[tokio::test]
async fn test_get_missing_account() {
    let service = AccountService::new();

    let result = service.get_account(42).await;
    match result {
        Err(Error::AccountNotFound(_)) => (),
        other => panic!("Expected AccountNotFound, got {:?}", other.map(|a| a.id)),
    }
}

#[tokio::test]
async fn test_list_accounts_in_creation_order() {
    let service = AccountService::new();

    assert!(service.list_accounts().await.unwrap().is_empty());

    let a = service.create_account("Grace", "Hopper").await.unwrap();
    let b = service.create_account("Alan", "Turing").await.unwrap();
    let c = service.create_account("Edsger", "Dijkstra").await.unwrap();

    let listed: Vec<i64> = service
        .list_accounts()
        .await
        .unwrap()
        .into_iter()
        .map(|acc| acc.id)
        .collect();
    assert_eq!(listed, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn test_delete_account() {
    let service = AccountService::new();
    let account = service.create_account("Ada", "Lovelace").await.unwrap();

    service.delete_account(account.id).await.unwrap();

    // Deleted record is gone
    match service.get_account(account.id).await {
        Err(Error::AccountNotFound(_)) => (),
        other => panic!("Expected AccountNotFound, got {:?}", other.map(|a| a.id)),
    }

    // Delete is not idempotent: the second delete fails
    match service.delete_account(account.id).await {
        Err(Error::AccountNotFound(_)) => (),
        other => panic!("Expected AccountNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_missing_account() {
    let service = AccountService::new();

    match service.delete_account(999).await {
        Err(Error::AccountNotFound(_)) => (),
        other => panic!("Expected AccountNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_credit_and_adjust_balance() {
    let service = AccountService::new();
    let account = service.create_account("Ada", "Lovelace").await.unwrap();

    let credited = service.credit(account.id, 500).await.unwrap();
    assert_eq!(credited.balance, 500);

    let debited = service.adjust_balance(account.id, -200).await.unwrap();
    assert_eq!(debited.balance, 300);
}

#[tokio::test]
async fn test_credit_rejects_non_positive_amount() {
    let service = AccountService::new();
    let account = service.create_account("Ada", "Lovelace").await.unwrap();

    for amount in [0, -5] {
        match service.credit(account.id, amount).await {
            Err(Error::ValidationError(_)) => (),
            other => panic!("Expected ValidationError, got {:?}", other.map(|a| a.balance)),
        }
    }

    // Nothing was applied
    let unchanged = service.get_account(account.id).await.unwrap();
    assert_eq!(unchanged.balance, 0);
}

#[tokio::test]
async fn test_adjust_balance_never_goes_negative() {
    let service = AccountService::new();
    let account = service.create_account("Ada", "Lovelace").await.unwrap();
    service.credit(account.id, 100).await.unwrap();

    match service.adjust_balance(account.id, -101).await {
        Err(Error::InsufficientFunds(_)) => (),
        other => panic!("Expected InsufficientFunds, got {:?}", other.map(|a| a.balance)),
    }

    // The failed debit left the balance untouched
    let unchanged = service.get_account(account.id).await.unwrap();
    assert_eq!(unchanged.balance, 100);
}

#[tokio::test]
async fn test_concurrent_debits_do_not_overdraw() {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let service = Arc::new(AccountService::with_repo(repo));

    let n: i64 = 100;
    let account = service.create_account("Busy", "Holder").await.unwrap();
    service.credit(account.id, 2 * n - 1).await.unwrap();

    // Two concurrent debits of n against a balance of 2n - 1: exactly one
    // can commit
    let mut handles = Vec::new();
    for _ in 0..2 {
        let service = service.clone();
        let id = account.id;
        handles.push(tokio::spawn(async move {
            service.adjust_balance(id, -n).await
        }));
    }

    let mut successes = 0;
    let mut insufficient = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(Error::InsufficientFunds(_)) => insufficient += 1,
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(insufficient, 1);

    let final_account = service.get_account(account.id).await.unwrap();
    assert_eq!(final_account.balance, n - 1);
}

/// Repository whose every call sleeps past the configured deadline
struct SlowRepository {
    inner: InMemoryAccountRepository,
    delay: Duration,
}

#[async_trait]
impl AccountRepository for SlowRepository {
    async fn create_account(&self, first_name: &str, last_name: &str) -> Result<Account> {
        tokio::time::sleep(self.delay).await;
        self.inner.create_account(first_name, last_name).await
    }

    async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_account(id).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list_accounts().await
    }

    async fn delete_account(&self, id: i64) -> Result<bool> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_account(id).await
    }

    async fn adjust_balance(&self, id: i64, delta: i64) -> Result<Account> {
        tokio::time::sleep(self.delay).await;
        self.inner.adjust_balance(id, delta).await
    }
}

#[tokio::test]
async fn test_slow_storage_surfaces_as_timeout() {
    let repo = Arc::new(SlowRepository {
        inner: InMemoryAccountRepository::new(),
        delay: Duration::from_millis(200),
    });
    let service = AccountService::with_repo_and_timeout(repo, Duration::from_millis(20));

    // The deadline elapses before the storage call returns; the failure is
    // a timeout, not a storage error
    match service.get_account(1).await {
        Err(Error::StorageTimeout(_)) => (),
        other => panic!("Expected StorageTimeout, got {:?}", other.map(|a| a.id)),
    }

    match service.create_account("Ada", "Lovelace").await {
        Err(Error::StorageTimeout(_)) => (),
        other => panic!("Expected StorageTimeout, got {:?}", other.map(|a| a.id)),
    }
}

#[tokio::test]
async fn test_slow_storage_within_deadline_succeeds() {
    let repo = Arc::new(SlowRepository {
        inner: InMemoryAccountRepository::new(),
        delay: Duration::from_millis(10),
    });
    let service = AccountService::with_repo_and_timeout(repo, Duration::from_secs(5));

    let account = service.create_account("Ada", "Lovelace").await.unwrap();
    assert_eq!(service.get_account(account.id).await.unwrap(), account);
}

#[tokio::test]
async fn test_balance_stays_non_negative_under_mixed_load() {
    let service = Arc::new(AccountService::new());
    let account = service.create_account("Load", "Test").await.unwrap();
    service.credit(account.id, 50).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        let id = account.id;
        let delta = if i % 2 == 0 { 10 } else { -15 };
        handles.push(tokio::spawn(
            async move { service.adjust_balance(id, delta).await },
        ));
    }

    for handle in handles {
        // Failures are allowed (insufficient funds), negative balances are not
        let _ = handle.await.unwrap();
    }

    let final_account = service.get_account(account.id).await.unwrap();
    assert!(final_account.balance >= 0);
}
