//! Server configuration from environment variables.
//!
//! | Variable                   | Default                                        |
//! |----------------------------|------------------------------------------------|
//! | `HOST`                     | `0.0.0.0`                                      |
//! | `PORT`                     | `5000`                                         |
//! | `DATABASE_URL`             | `postgres://localhost/jotter`                  |
//! | `STORE_BACKEND`            | `postgres` (or `memory`)                       |
//! | `DB_MAX_CONNECTIONS`       | `10`                                           |
//! | `ALLOWED_ORIGINS`          | `http://localhost:5173,http://localhost:3000`  |
//! | `AUTH_STATIC_TOKENS`       | unset (`token:uuid,...`)                       |
//! | `REQUEST_BODY_LIMIT_BYTES` | `1048576`                                      |
//!
//! Unparseable values fall back to the default with a warning.

use std::str::FromStr;

use tracing::warn;

use jotter_core::{defaults, Error};

/// Which [`NoteStore`](jotter_core::NoteStore) the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!("Unknown STORE_BACKEND '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub db_max_connections: u32,
    pub allowed_origins: String,
    pub static_tokens: Option<String>,
    pub request_body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            database_url: defaults::DATABASE_URL.to_string(),
            store_backend: StoreBackend::Postgres,
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
            allowed_origins: defaults::ALLOWED_ORIGINS.to_string(),
            static_tokens: None,
            request_body_limit_bytes: defaults::REQUEST_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(d.host),
            port: parse_or("PORT", lookup("PORT"), d.port),
            database_url: lookup("DATABASE_URL").unwrap_or(d.database_url),
            store_backend: parse_or("STORE_BACKEND", lookup("STORE_BACKEND"), d.store_backend),
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                d.db_max_connections,
            ),
            allowed_origins: lookup("ALLOWED_ORIGINS").unwrap_or(d.allowed_origins),
            static_tokens: lookup("AUTH_STATIC_TOKENS").filter(|s| !s.trim().is_empty()),
            request_body_limit_bytes: parse_or(
                "REQUEST_BODY_LIMIT_BYTES",
                lookup("REQUEST_BODY_LIMIT_BYTES"),
                d.request_body_limit_bytes,
            ),
        }
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => default,
        Some(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "config",
                    key,
                    value = %value,
                    error = %e,
                    "Invalid configuration value, using default"
                );
                default
            }
        },
    }
}
