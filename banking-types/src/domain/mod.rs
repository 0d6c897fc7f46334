//! Domain models and rules for the banking service.

pub mod account;
pub mod api_key;
pub mod authorization;
pub mod ledger;
pub mod money;

pub use account::{Account, AccountId, AccountStatus, AccountType, CustomerId, NewAccount};
pub use api_key::{ApiKey, ApiKeyId};
pub use authorization::{AuthorizationDecision, DenialReason, authorize};
pub use ledger::TransactionType;
pub use money::Money;
