//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /fw/{token}`  - Forward by token
//! - `GET  /aka/{name}`  - Forward by aka name
//! - `GET  /health`      - Health check: repository, click queue
//! - `/api/*`            - Link management and reports
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{forward_aka_handler, forward_token_handler, health_handler};
use crate::api::middleware::tracing;
use crate::domain::verification::{AKA_ENDPOINT, TOKEN_ENDPOINT};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the router with all routes and tracing, without path normalization.
///
/// The forward routes are built from the same endpoint names the link
/// verifier treats as self-references.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            &format!("/{TOKEN_ENDPOINT}/{{token}}"),
            get(forward_token_handler),
        )
        .route(
            &format!("/{AKA_ENDPOINT}/{{name}}"),
            get(forward_aka_handler),
        )
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with trailing-slash normalization.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
