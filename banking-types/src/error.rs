//! Error types for the banking service.
//!
//! Three layers, innermost first:
//! - [`DomainError`]: business rule violations raised by pure domain code
//! - [`RepoError`]: data access failures raised by repository adapters
//! - [`AppError`]: the five error kinds the service hands to inbound adapters

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountStatus, Money};

/// Classification every failure reduces to.
///
/// Inbound adapters translate a kind into their own status vocabulary
/// (HTTP status codes, CLI exit codes, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or disallowed input.
    Validation,
    /// Account (or other entity) does not exist.
    NotFound,
    /// Caller lacks permission for the target.
    Unauthorized,
    /// Request conflicts with current state (insufficient funds, concurrent update).
    Conflict,
    /// Persistence failure not caused by the caller.
    Storage,
}

impl ErrorKind {
    /// Returns true when the caller can fix the failure by changing the request.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Storage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Storage => "STORAGE",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level errors (business logic violations).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("zero-amount transaction not permitted")]
    ZeroAmount,

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: u64 },

    #[error("account not active (status {0})")]
    AccountNotActive(AccountStatus),

    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),

    #[error("Unknown account status: {0}")]
    UnknownAccountStatus(String),

    #[error("cannot change account status from {from} to {to}")]
    InvalidStatusTransition {
        from: AccountStatus,
        to: AccountStatus,
    },

    #[error("account must have a zero balance to be closed (balance {0})")]
    NonZeroBalance(Money),

    #[error("transaction would overflow the account balance")]
    BalanceOverflow,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InsufficientFunds { .. }
            | DomainError::AccountNotActive(_)
            | DomainError::InvalidStatusTransition { .. }
            | DomainError::NonZeroBalance(_) => ErrorKind::Conflict,
            DomainError::NegativeAmount
            | DomainError::ZeroAmount
            | DomainError::UnknownAccountType(_)
            | DomainError::UnknownAccountStatus(_)
            | DomainError::BalanceOverflow
            | DomainError::ValidationError(_) => ErrorKind::Validation,
        }
    }
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    /// A conditional write found the row changed since it was read.
    #[error("Stale write: the account was modified concurrently")]
    StaleWrite,
}

/// Application-level errors, one variant per [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// The human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg)
            | AppError::Storage(msg) => msg,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let msg = err.to_string();
        match err.kind() {
            ErrorKind::Conflict => AppError::Conflict(msg),
            _ => AppError::Validation(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::StaleWrite => AppError::Conflict(
                "account was modified concurrently, please retry the request".into(),
            ),
            RepoError::Database(e) => AppError::Storage(e),
        }
    }
}
