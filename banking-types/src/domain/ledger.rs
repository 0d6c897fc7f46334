//! Balance ledger: the only place a balance is computed.
//!
//! Everything here is pure. Callers read the current account, compute the
//! new balance with [`apply`], then persist it with a conditional write.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::Account;
use super::money::Money;
use crate::error::DomainError;

/// Direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming into the account
    Deposit,
    /// Money leaving the account
    Withdrawal,
}

impl TransactionType {
    /// Converts an unsigned request amount into the signed delta the ledger applies.
    pub fn signed_amount(self, amount: i64) -> Result<i64, DomainError> {
        if amount < 0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(match self {
            TransactionType::Deposit => amount,
            TransactionType::Withdrawal => -amount,
        })
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "DEPOSIT"),
            TransactionType::Withdrawal => write!(f, "WITHDRAWAL"),
        }
    }
}

/// Computes the balance that results from applying `requested` to `account`.
///
/// `requested` is signed: positive deposits, negative withdrawals.
/// The account itself is left untouched.
pub fn apply(account: &Account, requested: i64) -> Result<Money, DomainError> {
    if !account.is_active() {
        return Err(DomainError::AccountNotActive(account.status));
    }
    if requested == 0 {
        return Err(DomainError::ZeroAmount);
    }
    account.balance.checked_apply(requested)
}
