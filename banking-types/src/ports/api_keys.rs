//! API key storage port used by the authentication middleware.

use crate::domain::{ApiKey, ApiKeyId, CustomerId};
use crate::error::RepoError;

#[async_trait::async_trait]
pub trait ApiKeyStore: Send + Sync + 'static {
    /// Issues a key for a customer. Returns the stored key and the raw key,
    /// which is not recoverable afterwards.
    async fn create_api_key(
        &self,
        name: &str,
        customer_id: &CustomerId,
    ) -> Result<(ApiKey, String), RepoError>;

    /// Looks up an active key by hash and records its use.
    async fn verify_api_key_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, RepoError>;

    /// Lists active keys.
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, RepoError>;

    /// Deactivates a key. Returns false if no active key had that id.
    async fn delete_api_key(&self, id: ApiKeyId) -> Result<bool, RepoError>;
}
