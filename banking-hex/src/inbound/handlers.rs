//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use utoipa::ToSchema;

use banking_types::{
    AccountId, ApiKeyCreated, ApiKeyId, ApiKeyInfo, AppError, ChangeStatusRequest,
    CreateApiKeyRequest, ErrorKind, OpenAccountRequest, TransactionRequest,
};

use super::Store;
use super::auth::AuthenticatedCustomer;
use crate::AccountService;

/// Application state shared across handlers.
pub struct AppState<R: Store> {
    pub service: AccountService<R>,
    /// SHA-256 of the admin key guarding `/api/admin/*`.
    pub admin_key_hash: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    pub kind: ErrorKind,
    /// HTTP status code
    #[schema(example = 409)]
    pub code: u16,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

pub(crate) fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);

        // Storage details stay in the logs.
        let message = if kind.is_client_error() {
            self.0.message().to_string()
        } else {
            tracing::error!(error = %self.0, "request failed in storage");
            "Internal storage error".to_string()
        };

        let body = ErrorBody {
            error: message,
            kind,
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejections use the common error body.
///
/// Undecodable bodies (wrong types, missing fields, bad content type) are
/// reported as `VALIDATION` with a 400 instead of axum's plain-text 422.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text()).into()),
        }
    }
}

fn parse_account_id(id: &str) -> Result<AccountId, ApiError> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid account ID".into()).into())
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// Open an account for the caller.
#[tracing::instrument(skip(state, req), fields(customer_id = %customer.0, account_type = %req.account_type))]
pub async fn open_account<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    customer: AuthenticatedCustomer,
    JsonBody(req): JsonBody<OpenAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.service.open_account(&customer.0, req).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// List the caller's accounts.
#[tracing::instrument(skip(state), fields(customer_id = %customer.0))]
pub async fn list_accounts<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    customer: AuthenticatedCustomer,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.service.list_accounts(&customer.0).await?;
    Ok(Json(accounts))
}

/// Get account by ID.
#[tracing::instrument(skip(state, customer), fields(account_id = %id))]
pub async fn get_account<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    customer: AuthenticatedCustomer,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let account = state.service.get_account(account_id, &customer.0).await?;
    Ok(Json(account))
}

/// Deposit money into an account.
#[tracing::instrument(skip(state, customer, req), fields(account_id = %id, amount = req.amount))]
pub async fn deposit<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    customer: AuthenticatedCustomer,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<TransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let account = state
        .service
        .deposit(account_id, &customer.0, req.amount)
        .await?;
    Ok(Json(account))
}

/// Withdraw money from an account.
#[tracing::instrument(skip(state, customer, req), fields(account_id = %id, amount = req.amount))]
pub async fn withdraw<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    customer: AuthenticatedCustomer,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<TransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let account = state
        .service
        .withdraw(account_id, &customer.0, req.amount)
        .await?;
    Ok(Json(account))
}

/// Block, unblock or close an account.
#[tracing::instrument(skip(state, customer, req), fields(account_id = %id, status = %req.status))]
pub async fn change_status<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    customer: AuthenticatedCustomer,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ChangeStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let account = state
        .service
        .change_status(account_id, &customer.0, req.status)
        .await?;
    Ok(Json(account))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Key Management (admin)
// ─────────────────────────────────────────────────────────────────────────────

/// Issue an API key for a customer. The raw key is returned once.
#[tracing::instrument(skip(state, req), fields(key_name = %req.name, customer_id = %req.customer_id))]
pub async fn create_api_key<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    JsonBody(req): JsonBody<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("API key name cannot be empty".into()).into());
    }

    let (api_key, raw_key) = state
        .service
        .repo()
        .create_api_key(req.name.trim(), &req.customer_id)
        .await
        .map_err(AppError::from)?;

    tracing::info!(key_id = %api_key.id, "API key issued");

    Ok((
        StatusCode::CREATED,
        Json(ApiKeyCreated {
            id: api_key.id,
            customer_id: api_key.customer_id,
            api_key: raw_key,
            message: "API key created. Save this key securely - it won't be shown again!".into(),
        }),
    ))
}

/// List all active API keys (without exposing raw keys).
#[tracing::instrument(skip(state))]
pub async fn list_api_keys<R: Store>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let keys = state
        .service
        .repo()
        .list_api_keys()
        .await
        .map_err(AppError::from)?;

    let response: Vec<ApiKeyInfo> = keys.into_iter().map(ApiKeyInfo::from).collect();
    Ok(Json(response))
}

/// Delete (deactivate) an API key.
#[tracing::instrument(skip(state), fields(key_id = %id))]
pub async fn delete_api_key<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let key_id: ApiKeyId = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid API key ID".into()))?;

    let deleted = state
        .service
        .repo()
        .delete_api_key(key_id)
        .await
        .map_err(AppError::from)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(AppError::NotFound("API key not found".into()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::Storage),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError(AppError::Conflict("insufficient funds".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "insufficient funds");
        assert_eq!(json["kind"], "CONFLICT");
        assert_eq!(json["code"], 409);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_a_validation_error() {
        let req = axum::http::Request::builder()
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"amount": 10.5}"#))
            .unwrap();

        let Err(err) = JsonBody::<TransactionRequest>::from_request(req, &()).await else {
            panic!("fractional amount was accepted");
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "VALIDATION");
        assert_eq!(json["code"], 400);
    }

    #[tokio::test]
    async fn test_storage_details_are_hidden() {
        let response =
            ApiError(AppError::Storage("connection refused at 10.0.0.3".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "STORAGE");
        assert!(!json["error"].as_str().unwrap().contains("10.0.0.3"));
    }
}
