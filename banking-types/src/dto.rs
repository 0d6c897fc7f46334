//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountId, AccountStatus, AccountType, ApiKeyId, CustomerId, Money};

// ─────────────────────────────────────────────────────────────────────────────
// Account DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to open a new account for the authenticated customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OpenAccountRequest {
    /// Account category: `saving` or `checking`
    #[schema(example = "saving")]
    pub account_type: String,
    /// Opening amount in minor units (e.g., cents)
    #[schema(example = 10000)]
    #[serde(default)]
    pub amount: i64,
}

/// Public projection of an account.
///
/// Owner and storage details are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountView {
    /// Unique account identifier
    pub id: AccountId,
    pub account_type: AccountType,
    pub status: AccountStatus,
    /// Current balance in minor units
    pub balance: Money,
}

/// Request to change an account's lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    pub status: AccountStatus,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to deposit into or withdraw from an account.
///
/// The direction comes from the endpoint; the amount must not be negative.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionRequest {
    /// Amount in minor units
    #[schema(example = 5000)]
    pub amount: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// API Key DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to issue an API key for a customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateApiKeyRequest {
    /// Name for the API key
    #[schema(example = "mobile-app")]
    pub name: String,
    /// Customer the key authenticates as
    pub customer_id: CustomerId,
}

/// Response carrying a freshly issued key. The raw key is shown only once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyCreated {
    pub id: ApiKeyId,
    pub customer_id: CustomerId,
    /// The generated API key
    #[schema(example = "sk_abc123xyz...")]
    pub api_key: String,
    /// Informational message
    pub message: String,
}

/// API key metadata (without the raw key).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyInfo {
    pub id: ApiKeyId,
    pub name: String,
    pub customer_id: CustomerId,
    pub is_active: bool,
    /// When the key was created (ISO 8601)
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub created_at: String,
    /// When the key was last used (ISO 8601)
    pub last_used_at: Option<String>,
}

impl From<crate::domain::ApiKey> for ApiKeyInfo {
    fn from(key: crate::domain::ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            customer_id: key.customer_id,
            is_active: key.is_active,
            created_at: key.created_at.to_rfc3339(),
            last_used_at: key.last_used_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
