//! Account repository port.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory test doubles) implement this trait.

use crate::domain::{Account, AccountId, AccountStatus, CustomerId, Money, NewAccount};
use crate::error::RepoError;

/// Persistence contract for accounts.
///
/// The repository exclusively owns persisted account state. Balance and
/// status changes go through conditional writes so that a request acting on
/// a stale read fails with [`RepoError::StaleWrite`] instead of overwriting a
/// concurrent update.
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Loads an account. Fails with `NotFound` if it does not exist.
    async fn find_by_id(&self, id: AccountId) -> Result<Account, RepoError>;

    /// Persists a new account and assigns its identity.
    async fn save_new(&self, account: NewAccount) -> Result<Account, RepoError>;

    /// Lists the accounts owned by a customer, newest first.
    async fn list_for_owner(&self, owner: &CustomerId) -> Result<Vec<Account>, RepoError>;

    /// Sets the balance to `new_balance` only if the stored balance still
    /// equals `expected` and the account is still active.
    ///
    /// Fails with `StaleWrite` when the precondition no longer holds and
    /// with `NotFound` when the account is gone.
    async fn compare_and_update_balance(
        &self,
        id: AccountId,
        expected: Money,
        new_balance: Money,
    ) -> Result<(), RepoError>;

    /// Sets the status to `new_status` only if the stored status still equals
    /// `expected`. Closing additionally requires a zero stored balance.
    ///
    /// Fails with `StaleWrite` when the precondition no longer holds and
    /// with `NotFound` when the account is gone.
    async fn compare_and_update_status(
        &self,
        id: AccountId,
        expected: AccountStatus,
        new_status: AccountStatus,
    ) -> Result<(), RepoError>;
}
