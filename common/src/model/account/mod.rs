//! Account models and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Account model
///
/// `id` is assigned by the store and is never caller-supplied. `number` is
/// the opaque external account number, unique per account. `balance` is in
/// minor currency units and is non-negative after every committed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Account {
    /// Unique account ID, assigned by the store
    pub id: i64,
    /// First name, set at creation
    pub first_name: String,
    /// Last name, set at creation
    pub last_name: String,
    /// External account number, unique per account
    pub number: i64,
    /// Balance in minor currency units, always >= 0
    pub balance: i64,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Result of a completed transfer, describing both updated accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct TransferResult {
    /// Debited account, post-transfer
    pub from: Account,
    /// Credited account, post-transfer
    pub to: Account,
    /// Amount moved, in minor currency units
    pub amount: i64,
}
