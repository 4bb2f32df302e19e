//! Wallet registry service
//!
//! Business rules for storing and reading email to wallet mappings. Every
//! operation runs inside one scoped storage session.

use crate::db::{self, wallets, Database};
use crate::models::{StoreWalletRequest, UserWallet};

/// Wallet service error
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Email already exists")]
    AlreadyExists,
    #[error("Wallet not found")]
    NotFound,
}

/// Wallet service
pub struct WalletService {
    db: Database,
}

impl WalletService {
    /// Create a new wallet service
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store a new email to wallet mapping
    ///
    /// # Errors
    /// Returns [`WalletError::AlreadyExists`] if the email is already
    /// registered. The existing row is left untouched.
    pub async fn store_wallet(&self, req: StoreWalletRequest) -> Result<UserWallet, WalletError> {
        let mut session = self.db.session().await?;

        if wallets::find_by_email(&mut session, &req.email).await?.is_some() {
            tracing::info!(email = %req.email, "wallet already registered");
            return Err(WalletError::AlreadyExists);
        }

        // A concurrent request may insert the same email between the lookup and
        // here; the unique index turns that into the same conflict.
        let record = wallets::insert(&mut session, &req.email, &req.wallet)
            .await
            .map_err(|e| {
                if db::is_unique_violation(&e) {
                    WalletError::AlreadyExists
                } else {
                    WalletError::Database(e)
                }
            })?;

        tracing::info!(id = record.id, email = %record.email, "wallet stored");
        Ok(record)
    }

    /// List every stored wallet, in insertion order
    pub async fn list_wallets(&self) -> Result<Vec<UserWallet>, WalletError> {
        let mut session = self.db.session().await?;
        let records = wallets::list_all(&mut session).await?;
        Ok(records)
    }

    /// Get the wallet stored for `email`, compared literally
    pub async fn get_wallet(&self, email: &str) -> Result<UserWallet, WalletError> {
        let mut session = self.db.session().await?;
        wallets::find_by_email(&mut session, email)
            .await?
            .ok_or(WalletError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn service() -> WalletService {
        WalletService::new(Database::connect_in_memory().await.unwrap())
    }

    fn request(email: &str, wallet: &str) -> StoreWalletRequest {
        StoreWalletRequest {
            email: email.to_string(),
            wallet: wallet.to_string(),
        }
    }

    #[tokio::test]
    async fn store_then_get() {
        let service = service().await;
        service.store_wallet(request("a@x.com", "0xABC")).await.unwrap();

        let record = service.get_wallet("a@x.com").await.unwrap();
        assert_eq!(record.email, "a@x.com");
        assert_eq!(record.wallet, "0xABC");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_and_keeps_first() {
        let service = service().await;
        service.store_wallet(request("a@x.com", "0xABC")).await.unwrap();

        let err = service
            .store_wallet(request("a@x.com", "0xDEF"))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::AlreadyExists));

        assert_eq!(service.get_wallet("a@x.com").await.unwrap().wallet, "0xABC");
        assert_eq!(service.list_wallets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_email_is_not_found() {
        let service = service().await;
        let err = service.get_wallet("b@x.com").await.unwrap_err();
        assert!(matches!(err, WalletError::NotFound));
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let service = service().await;
        service.store_wallet(request("a@x.com", "0xABC")).await.unwrap();

        assert!(matches!(
            service.get_wallet("A@X.COM").await,
            Err(WalletError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_returns_every_record() {
        let service = service().await;
        assert!(service.list_wallets().await.unwrap().is_empty());

        let inputs = [("a@x.com", "1"), ("b@x.com", "2"), ("c@x.com", "3")];
        for (email, wallet) in inputs {
            service.store_wallet(request(email, wallet)).await.unwrap();
        }

        let listed: Vec<(String, String)> = service
            .list_wallets()
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.email, r.wallet))
            .collect();
        let expected: Vec<(String, String)> = inputs
            .iter()
            .map(|(e, w)| (e.to_string(), w.to_string()))
            .collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_for_one_email_yield_single_row() {
        let db = Database::connect("sqlite::memory:", 8).await.unwrap();
        let service = Arc::new(WalletService::new(db));

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .store_wallet(request("race@x.com", &format!("0x{i}")))
                        .await
                })
            })
            .collect();

        let (mut stored, mut conflicts) = (0, 0);
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => stored += 1,
                Err(WalletError::AlreadyExists) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(stored, 1);
        assert_eq!(conflicts, 19);
        assert_eq!(service.list_wallets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_backend_surfaces_database_error() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = WalletService::new(db.clone());
        db.close().await;

        let err = service.list_wallets().await.unwrap_err();
        assert!(matches!(err, WalletError::Database(_)));
    }
}
