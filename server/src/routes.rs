//! Route definitions for the wallet registry API

use axum::http::{HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::{ConfigError, CORS_ALLOWED_ORIGINS_ENV};
use crate::handlers::*;

// Wallet routes
pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/store_wallet/", post(store_wallet))
        .route("/wallets/", get(list_wallets))
        .route("/wallet/:email", get(get_wallet))
}

// Service routes
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

/// Full application router with state, CORS and request tracing applied.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(service_routes())
        .merge(wallet_routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer. An empty allow-list means permissive.
pub fn configure_cors(allowed_origins: &[String]) -> Result<CorsLayer, ConfigError> {
    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return Ok(CorsLayer::permissive());
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ConfigError::Invalid {
                    name: CORS_ALLOWED_ORIGINS_ENV,
                    value: origin.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}
