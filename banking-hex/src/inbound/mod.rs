//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod auth;
pub(crate) mod handlers;
mod rate_limit;
mod server;

use banking_types::{AccountRepository, ApiKeyStore};

pub use auth::AuthenticatedCustomer;
pub use handlers::ErrorBody;
pub use rate_limit::RateLimiterState;
pub use server::HttpServer;

/// Storage the HTTP adapter needs: accounts plus the API keys that
/// authenticate customers.
pub trait Store: AccountRepository + ApiKeyStore {}

impl<T: AccountRepository + ApiKeyStore> Store for T {}
