//! # Banking Types
//!
//! Domain types, ledger rules and port traits for the banking service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Account model, balance ledger, authorization guard
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Account, AccountId, AccountStatus, AccountType, ApiKey, ApiKeyId, AuthorizationDecision,
    CustomerId, Money, NewAccount, TransactionType,
};
pub use dto::*;
pub use error::{AppError, DomainError, ErrorKind, RepoError};
pub use ports::{AccountRepository, ApiKeyStore};
