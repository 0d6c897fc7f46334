//! HTTP Server configuration and startup.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use banking_repo::security;

use super::Store;
use super::auth::auth_middleware;
use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::AccountService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Banking API.
pub struct HttpServer<R: Store> {
    state: Arc<AppState<R>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<R: Store> HttpServer<R> {
    /// Creates a new HTTP server with the given service and admin key.
    pub fn new(service: AccountService<R>, admin_api_key: &str) -> Self {
        Self {
            state: Self::state(service, admin_api_key),
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req/min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(
        service: AccountService<R>,
        admin_api_key: &str,
        requests_per_minute: u32,
    ) -> Self {
        Self {
            state: Self::state(service, admin_api_key),
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
        }
    }

    fn state(service: AccountService<R>, admin_api_key: &str) -> Arc<AppState<R>> {
        Arc::new(AppState {
            service,
            admin_key_hash: security::hash_api_key(admin_api_key),
        })
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/accounts",
                post(handlers::open_account::<R>).get(handlers::list_accounts::<R>),
            )
            .route("/api/accounts/{id}", get(handlers::get_account::<R>))
            .route("/api/accounts/{id}/deposit", post(handlers::deposit::<R>))
            .route("/api/accounts/{id}/withdraw", post(handlers::withdraw::<R>))
            .route("/api/accounts/{id}/status", put(handlers::change_status::<R>))
            .route(
                "/api/admin/keys",
                post(handlers::create_api_key::<R>).get(handlers::list_api_keys::<R>),
            )
            .route("/api/admin/keys/{id}", delete(handlers::delete_api_key::<R>))
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware::<R>,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
            // Docs are public and unmetered.
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
