//! Storage bootstrap and persistence gateway for `user_wallets`
//!
//! A [`Database`] wraps the process-wide SQLite pool. Handlers never touch the
//! pool directly: they open a [`Session`] for the duration of one request and
//! run the repository functions in [`wallets`] against it. The pooled
//! connection goes back to the pool when the session is dropped, whichever way
//! the caller exits.

use std::path::Path;
use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;

/// Scoped storage session, bound to a single request.
pub type Session = PoolConnection<Sqlite>;

/// Shared storage handle
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `url`, creating the database file (and its directory) when
    /// missing, then make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let mut options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);

        match database_file(url) {
            Some(file) => {
                if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
                }
            }
            None => {
                // An in-memory database lives only as long as one connection to it
                // stays open, and is only visible to the other pooled connections
                // through the shared cache.
                options = options.shared_cache(true);
                pool_options = pool_options
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None);
            }
        }

        let pool = pool_options.connect_with(options).await?;

        init_schema(&pool).await?;
        tracing::debug!(url, "user_wallets schema ready");

        Ok(Self { pool })
    }

    /// Fresh private in-memory database, used by tests.
    pub async fn connect_in_memory() -> Result<Self, sqlx::Error> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Acquire a scoped session.
    pub async fn session(&self) -> Result<Session, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Round-trip a trivial query to confirm the backend is reachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut session = self.session().await?;
        sqlx::query("SELECT 1").execute(&mut *session).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Path of the database file named by a SQLite URL, `None` for in-memory.
fn database_file(url: &str) -> Option<&Path> {
    if url.contains(":memory:") || url.contains("mode=memory") {
        return None;
    }
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    (!path.is_empty()).then(|| Path::new(path))
}

/// Create the `user_wallets` table and its email index if absent.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_wallets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            wallet TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ix_user_wallets_email
        ON user_wallets (email);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Repository functions over a single connection.
pub mod wallets {
    use sqlx::SqliteConnection;

    use crate::models::UserWallet;

    /// Look up a record by exact email. Absence is `Ok(None)`.
    pub async fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<UserWallet>, sqlx::Error> {
        sqlx::query_as::<_, UserWallet>(
            "SELECT id, email, wallet FROM user_wallets WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(conn)
        .await
    }

    /// Insert a new row and return it with its assigned id.
    ///
    /// The unique index on `email` rejects duplicates with a database error;
    /// callers are expected to have checked with [`find_by_email`] first.
    pub async fn insert(
        conn: &mut SqliteConnection,
        email: &str,
        wallet: &str,
    ) -> Result<UserWallet, sqlx::Error> {
        sqlx::query_as::<_, UserWallet>(
            r#"
            INSERT INTO user_wallets (email, wallet)
            VALUES (?, ?)
            RETURNING id, email, wallet
            "#,
        )
        .bind(email)
        .bind(wallet)
        .fetch_one(conn)
        .await
    }

    /// Every record, in insertion order.
    pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<UserWallet>, sqlx::Error> {
        sqlx::query_as::<_, UserWallet>("SELECT id, email, wallet FROM user_wallets ORDER BY id")
            .fetch_all(conn)
            .await
    }
}

/// True when `err` comes from a violated unique constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
