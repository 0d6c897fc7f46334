//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod api_keys;
mod repository;

pub use api_keys::ApiKeyStore;
pub use repository::AccountRepository;
