//! Data models for the wallet registry

use std::borrow::Cow;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Stored email to wallet association (`user_wallets` row)
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserWallet {
    pub id: i64,
    pub email: String,
    pub wallet: String,
}

impl From<UserWallet> for WalletResponse {
    fn from(record: UserWallet) -> Self {
        Self {
            email: record.email,
            wallet: record.wallet,
        }
    }
}

const INVALID_EMAIL: &str = "value is not a valid email address";

/// Body of `POST /store_wallet/`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreWalletRequest {
    #[validate(
        email(message = "value is not a valid email address"),
        custom = "validate_email_parts"
    )]
    pub email: String,
    pub wallet: String,
}

/// Stricter checks on top of the `email` rule: dot placement in the local
/// part, and a dotted hostname (no IP literals) for the domain.
fn validate_email_parts(email: &str) -> Result<(), ValidationError> {
    // missing '@' is already reported by the `email` rule
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Ok(());
    };

    let local_ok = !local.starts_with('.') && !local.ends_with('.') && !local.contains("..");
    let domain_ok = !domain.starts_with('[')
        && domain.parse::<IpAddr>().is_err()
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());

    if local_ok && domain_ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some(Cow::Borrowed(INVALID_EMAIL));
        Err(err)
    }
}

/// Public representation of a stored wallet. The row id is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletResponse {
    pub email: String,
    pub wallet: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}
