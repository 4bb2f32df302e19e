//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::db::Database;
use crate::wallet::WalletService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub wallet_service: Arc<WalletService>,
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            wallet_service: Arc::new(WalletService::new(db.clone())),
            db,
        }
    }
}

impl FromRef<AppState> for Arc<WalletService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.wallet_service.clone()
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}
