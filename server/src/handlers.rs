//! API handlers for the wallet registry

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::db::Database;
use crate::error::{ApiError, ValidatedJson};
use crate::models::{HealthResponse, StoreWalletRequest, WalletResponse};
use crate::wallet::WalletService;

pub async fn root() -> &'static str {
    "Wallet Registry API Server"
}

/// Liveness plus a database round-trip
pub async fn health_check(State(db): State<Database>) -> (StatusCode, Json<HealthResponse>) {
    match db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: "ok".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    database: "unavailable".to_string(),
                }),
            )
        }
    }
}

// ===== Wallet Handlers =====

/// Store a new email to wallet mapping
pub async fn store_wallet(
    State(service): State<Arc<WalletService>>,
    ValidatedJson(request): ValidatedJson<StoreWalletRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let record = service.store_wallet(request).await?;
    Ok(Json(record.into()))
}

/// List every stored wallet
pub async fn list_wallets(
    State(service): State<Arc<WalletService>>,
) -> Result<Json<Vec<WalletResponse>>, ApiError> {
    let records = service.list_wallets().await?;
    Ok(Json(records.into_iter().map(WalletResponse::from).collect()))
}

/// Get a wallet by email. The path segment is matched verbatim.
pub async fn get_wallet(
    State(service): State<Arc<WalletService>>,
    Path(email): Path<String>,
) -> Result<Json<WalletResponse>, ApiError> {
    let record = service.get_wallet(&email).await?;
    Ok(Json(record.into()))
}
