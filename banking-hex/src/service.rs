//! Account Application Service
//!
//! Orchestrates domain operations through the repository port.
//! Contains NO infrastructure logic - pure business orchestration.

use banking_types::domain::{authorize, ledger};
use banking_types::{
    AccountId, AccountRepository, AccountStatus, AccountView, AppError, CustomerId, NewAccount,
    OpenAccountRequest, RepoError, TransactionType,
};

/// Total attempts (first try included) for a read-validate-write cycle.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Application service for account operations.
///
/// Generic over `R: AccountRepository` - the adapter is injected at compile time.
/// This enables:
/// - Swapping repositories without code changes
/// - Testing with in-memory repo
/// - Compile-time checks for port implementation
///
/// Every balance or status change follows the same cycle: read the account,
/// authorize the caller, validate the change, then persist it with a
/// conditional write. When the conditional write reports that the account
/// moved underneath us, the whole cycle runs again from a fresh read, at
/// most `max_attempts` times.
pub struct AccountService<R: AccountRepository> {
    repo: R,
    max_attempts: u32,
}

impl<R: AccountRepository> AccountService<R> {
    /// Creates a new account service with the given repository.
    pub fn new(repo: R) -> Self {
        Self::with_max_attempts(repo, DEFAULT_MAX_ATTEMPTS)
    }

    /// Creates a service with a custom attempt budget (at least one).
    pub fn with_max_attempts(repo: R, max_attempts: u32) -> Self {
        Self {
            repo,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Account Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Opens an active account for `customer` holding the opening amount.
    pub async fn open_account(
        &self,
        customer: &CustomerId,
        req: OpenAccountRequest,
    ) -> Result<AccountView, AppError> {
        let new_account = NewAccount::new(customer.clone(), &req.account_type, req.amount)?;
        let account = self.repo.save_new(new_account).await?;

        tracing::info!(
            account_id = %account.id,
            account_type = %account.account_type,
            "account opened"
        );
        Ok(account.to_view())
    }

    /// Gets an account the caller owns.
    pub async fn get_account(
        &self,
        id: AccountId,
        customer: &CustomerId,
    ) -> Result<AccountView, AppError> {
        let account = self.repo.find_by_id(id).await?;
        authorize(customer, &account).into_result()?;
        Ok(account.to_view())
    }

    /// Lists the caller's accounts.
    pub async fn list_accounts(&self, customer: &CustomerId) -> Result<Vec<AccountView>, AppError> {
        let accounts = self.repo.list_for_owner(customer).await?;
        Ok(accounts.iter().map(|a| a.to_view()).collect())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Balance Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Deposits `amount` minor units into an account the caller owns.
    pub async fn deposit(
        &self,
        id: AccountId,
        customer: &CustomerId,
        amount: i64,
    ) -> Result<AccountView, AppError> {
        self.apply_transaction(id, customer, TransactionType::Deposit, amount)
            .await
    }

    /// Withdraws `amount` minor units from an account the caller owns.
    pub async fn withdraw(
        &self,
        id: AccountId,
        customer: &CustomerId,
        amount: i64,
    ) -> Result<AccountView, AppError> {
        self.apply_transaction(id, customer, TransactionType::Withdrawal, amount)
            .await
    }

    async fn apply_transaction(
        &self,
        id: AccountId,
        customer: &CustomerId,
        kind: TransactionType,
        amount: i64,
    ) -> Result<AccountView, AppError> {
        let delta = kind
            .signed_amount(amount)
            .map_err(|_| AppError::Validation("amount must not be negative".into()))?;

        for attempt in 1..=self.max_attempts {
            let mut account = self.repo.find_by_id(id).await?;
            authorize(customer, &account).into_result()?;
            let new_balance = ledger::apply(&account, delta)?;

            match self
                .repo
                .compare_and_update_balance(id, account.balance, new_balance)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        account_id = %id,
                        transaction = %kind,
                        amount,
                        balance = new_balance.amount(),
                        "balance updated"
                    );
                    account.balance = new_balance;
                    return Ok(account.to_view());
                }
                Err(RepoError::StaleWrite) => {
                    tracing::debug!(account_id = %id, attempt, "stale balance, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            account_id = %id,
            attempts = self.max_attempts,
            "giving up after repeated concurrent updates"
        );
        Err(RepoError::StaleWrite.into())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────────

    /// Moves an account the caller owns to `new_status`.
    pub async fn change_status(
        &self,
        id: AccountId,
        customer: &CustomerId,
        new_status: AccountStatus,
    ) -> Result<AccountView, AppError> {
        for attempt in 1..=self.max_attempts {
            let mut account = self.repo.find_by_id(id).await?;
            authorize(customer, &account).into_result()?;
            account.check_status_change(new_status)?;

            match self
                .repo
                .compare_and_update_status(id, account.status, new_status)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        account_id = %id,
                        from = %account.status,
                        to = %new_status,
                        "account status changed"
                    );
                    account.status = new_status;
                    return Ok(account.to_view());
                }
                Err(RepoError::StaleWrite) => {
                    tracing::debug!(account_id = %id, attempt, "stale status, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            account_id = %id,
            attempts = self.max_attempts,
            "giving up after repeated concurrent updates"
        );
        Err(RepoError::StaleWrite.into())
    }
}
