//! Authentication middleware for API key validation.
//!
//! Resolves the bearer key to the customer it was issued for. The service
//! trusts that customer id as the caller's identity.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use banking_repo::security;
use banking_types::{CustomerId, ErrorKind};

use super::Store;
use super::handlers::{AppState, ErrorBody};

/// Customer resolved from the request's API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCustomer(pub CustomerId);

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedCustomer {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedCustomer>()
            .cloned()
            .ok_or_else(|| unauthorized_response("Missing or invalid Authorization header"))
    }
}

/// Extracts the API key from the Authorization header.
/// Expected format: "Bearer <api_key>" or just "<api_key>"
pub(crate) fn extract_api_key(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;
    let key = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!key.is_empty()).then_some(key)
}

fn is_admin_path(path: &str) -> bool {
    path == "/api/admin" || path.starts_with("/api/admin/")
}

/// Authentication middleware that validates API keys.
///
/// - `/health` is public
/// - `/api/admin/*` requires the configured admin key
/// - everything else requires an active customer key, whose customer is
///   attached to the request as [`AuthenticatedCustomer`]
///
/// Missing or unknown keys get 401.
pub async fn auth_middleware<R: Store>(
    State(state): State<Arc<AppState<R>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let Some(api_key) = extract_api_key(auth_header).map(str::to_owned) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    if is_admin_path(request.uri().path()) {
        if security::verify_api_key(&api_key, &state.admin_key_hash) {
            return next.run(request).await;
        }
        tracing::warn!(path = %request.uri().path(), "rejected admin request");
        return unauthorized_response("Invalid admin key");
    }

    let key_hash = security::hash_api_key(&api_key);

    match state.service.repo().verify_api_key_hash(&key_hash).await {
        Ok(Some(key)) => {
            tracing::debug!(key_id = %key.id, "API key accepted");
            request
                .extensions_mut()
                .insert(AuthenticatedCustomer(key.customer_id));
            next.run(request).await
        }
        Ok(None) => unauthorized_response("Invalid API key"),
        Err(e) => {
            tracing::error!("API key verification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Internal server error".into(),
                    kind: ErrorKind::Storage,
                    code: 500,
                }),
            )
                .into_response()
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: message.to_string(),
            kind: ErrorKind::Unauthorized,
            code: 401,
        }),
    )
        .into_response()
}
