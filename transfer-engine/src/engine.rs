//! Transfer engine
//!
//! Orchestrates a balance movement between two accounts. The account store
//! guarantees atomicity per account id only, so the engine supplies the
//! cross-account consistency itself: debit first, credit second, and revert
//! the debit if the credit leg fails. No partial transfer is ever visible
//! externally.

use std::sync::Arc;

use account_store::AccountService;
use common::error::{Error, Result};
use common::model::account::TransferResult;
use tracing::{error, info, warn};

/// The transfer engine responsible for moving funds between accounts
pub struct TransferEngine {
    /// Account store owning the authoritative balances
    accounts: Arc<AccountService>,
}

impl TransferEngine {
    /// Create a new transfer engine over an account service
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }

    /// Move `amount` from `from_id` to `to_id`
    ///
    /// Preconditions: the ids differ, the amount is positive, both accounts
    /// exist. On a credit-leg failure after a committed debit, the debit is
    /// compensated and the whole transfer reported as `TransferFailed`.
    pub async fn transfer(&self, from_id: i64, to_id: i64, amount: i64) -> Result<TransferResult> {
        if amount <= 0 {
            return Err(Error::InvalidTransfer(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        if from_id == to_id {
            return Err(Error::InvalidTransfer(format!(
                "cannot transfer from account {} to itself",
                from_id
            )));
        }

        // Both accounts must exist before either leg runs
        self.accounts.get_account(from_id).await?;
        self.accounts.get_account(to_id).await?;

        info!(
            "Transferring {} from account {} to account {}",
            amount, from_id, to_id
        );

        // Debit leg. An insufficient balance aborts here with no mutation to
        // the destination.
        let from = self.accounts.adjust_balance(from_id, -amount).await?;

        // Credit leg, with compensation of the debit on failure.
        match self.accounts.adjust_balance(to_id, amount).await {
            Ok(to) => {
                info!(
                    "Transfer complete: account {} now {}, account {} now {}",
                    from.id, from.balance, to.id, to.balance
                );
                Ok(TransferResult { from, to, amount })
            }
            Err(credit_err) => {
                warn!(
                    "Credit to account {} failed ({}), compensating debit on account {}",
                    to_id, credit_err, from_id
                );

                if let Err(comp_err) = self.accounts.adjust_balance(from_id, amount).await {
                    // The debit committed and could not be reverted; there is
                    // no further automatic recovery without a persistent
                    // journal, so surface it loudly for the operator.
                    error!(
                        "Compensation of {} on account {} failed: {}",
                        amount, from_id, comp_err
                    );
                }

                Err(Error::TransferFailed(format!(
                    "credit to account {} failed after debit: {}",
                    to_id, credit_err
                )))
            }
        }
    }
}
