//! Runtime configuration for the wallet registry server
//!
//! Values are read from the process environment (after `.env` is loaded by
//! `main`). Every variable is optional and falls back to a default.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_URL` | SQLite connection string | `sqlite://db/data.db` |
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `8000` |
//! | `DB_MAX_CONNECTIONS` | Connection pool size | `5` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated origin allow-list | permissive |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DB_MAX_CONNECTIONS_ENV: &str = "DB_MAX_CONNECTIONS";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://db/data.db";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub db_max_connections: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let host = match lookup(HOST_ENV) {
            Some(value) => parse_var(HOST_ENV, value)?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match lookup(PORT_ENV) {
            Some(value) => parse_var(PORT_ENV, value)?,
            None => DEFAULT_PORT,
        };

        let db_max_connections = match lookup(DB_MAX_CONNECTIONS_ENV) {
            Some(value) => parse_var::<u32>(DB_MAX_CONNECTIONS_ENV, value)?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: DB_MAX_CONNECTIONS_ENV,
                value: "0".to_string(),
            });
        }

        let cors_allowed_origins = lookup(CORS_ALLOWED_ORIGINS_ENV)
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            cors_allowed_origins,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.socket_addr(), "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9090"),
            ("DB_MAX_CONNECTIONS", "2"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.socket_addr(), "0.0.0.0:9090".parse().unwrap());
        assert_eq!(config.db_max_connections, 2);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn rejects_zero_pool_size() {
        assert!(Config::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
    }
}
