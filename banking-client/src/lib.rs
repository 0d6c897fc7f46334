//! # Banking Client SDK
//!
//! A typed Rust client for the Banking API.

use banking_types::{
    AccountId, AccountStatus, AccountView, ApiKeyCreated, ApiKeyId, ApiKeyInfo,
    ChangeStatusRequest, CreateApiKeyRequest, CustomerId, ErrorKind, OpenAccountRequest,
    TransactionRequest,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        /// Error kind reported by the server, when the body carried one.
        kind: Option<ErrorKind>,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// The server-side error kind, if this is an API error that reported one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Api { kind, .. } => *kind,
            _ => None,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Banking API client.
pub struct BankingClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl BankingClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            http: Client::new(),
        }
    }

    /// Sets the API key for authentication (customer key or admin key).
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens an account for the authenticated customer.
    pub async fn open_account(
        &self,
        account_type: &str,
        amount: i64,
    ) -> Result<AccountView, ClientError> {
        let req = OpenAccountRequest {
            account_type: account_type.to_string(),
            amount,
        };
        self.send(self.http.post(self.url("/api/accounts")).json(&req))
            .await
    }

    /// Gets an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<AccountView, ClientError> {
        self.send(self.http.get(self.url(&format!("/api/accounts/{}", id))))
            .await
    }

    /// Lists the authenticated customer's accounts.
    pub async fn list_accounts(&self) -> Result<Vec<AccountView>, ClientError> {
        self.send(self.http.get(self.url("/api/accounts"))).await
    }

    /// Deposits money into an account.
    pub async fn deposit(&self, id: AccountId, amount: i64) -> Result<AccountView, ClientError> {
        let req = TransactionRequest { amount };
        self.send(
            self.http
                .post(self.url(&format!("/api/accounts/{}/deposit", id)))
                .json(&req),
        )
        .await
    }

    /// Withdraws money from an account.
    pub async fn withdraw(&self, id: AccountId, amount: i64) -> Result<AccountView, ClientError> {
        let req = TransactionRequest { amount };
        self.send(
            self.http
                .post(self.url(&format!("/api/accounts/{}/withdraw", id)))
                .json(&req),
        )
        .await
    }

    /// Blocks, unblocks or closes an account.
    pub async fn set_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<AccountView, ClientError> {
        let req = ChangeStatusRequest { status };
        self.send(
            self.http
                .put(self.url(&format!("/api/accounts/{}/status", id)))
                .json(&req),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API keys (admin key required)
    // ─────────────────────────────────────────────────────────────────────────

    /// Issues an API key for a customer.
    pub async fn create_api_key(
        &self,
        name: &str,
        customer_id: CustomerId,
    ) -> Result<ApiKeyCreated, ClientError> {
        let req = CreateApiKeyRequest {
            name: name.to_string(),
            customer_id,
        };
        self.send(self.http.post(self.url("/api/admin/keys")).json(&req))
            .await
    }

    /// Lists active API keys.
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKeyInfo>, ClientError> {
        self.send(self.http.get(self.url("/api/admin/keys"))).await
    }

    /// Deactivates an API key.
    pub async fn delete_api_key(&self, id: ApiKeyId) -> Result<(), ClientError> {
        let resp = self
            .authorized(self.http.delete(self.url(&format!("/api/admin/keys/{}", id))))
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), body))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = self.authorized(req).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), body))
        }
    }
}

/// Builds an API error from a non-success response body.
fn api_error(status: u16, body: String) -> ClientError {
    let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
    let kind = parsed
        .as_ref()
        .and_then(|v| v.get("kind").cloned())
        .and_then(|k| serde_json::from_value(k).ok());
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body);

    ClientError::Api {
        status,
        kind,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BankingClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = BankingClient::new("http://localhost:3000/");
        assert_eq!(client.url("/api/accounts"), "http://localhost:3000/api/accounts");
    }

    #[test]
    fn test_client_with_api_key() {
        let client = BankingClient::new("http://localhost:3000").with_api_key("test-key");
        assert_eq!(client.api_key, Some("test-key".to_string()));
    }

    #[test]
    fn test_api_error_reads_kind_and_message() {
        let err = api_error(
            409,
            r#"{"error":"insufficient funds: available 30, requested 50","kind":"CONFLICT","code":409}"#
                .to_string(),
        );

        assert_eq!(err.kind(), Some(ErrorKind::Conflict));
        assert_eq!(err.status(), Some(409));
        assert!(err.to_string().contains("insufficient funds"));
    }

    #[test]
    fn test_api_error_with_plain_body() {
        let err = api_error(502, "Bad Gateway".to_string());

        assert_eq!(err.kind(), None);
        assert!(matches!(err, ClientError::Api { ref message, .. } if message == "Bad Gateway"));
    }
}
