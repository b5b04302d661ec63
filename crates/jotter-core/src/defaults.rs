//! Centralized default constants for jotter.
//!
//! All crates reference these constants instead of defining their own magic
//! values.

// =============================================================================
// NOTES
// =============================================================================

/// Background color given to notes created without one.
pub const BACKGROUND_COLOR: &str = "#ffffff";

/// Query-string value that selects the archived or trashed view.
pub const VIEW_FLAG_TRUE: &str = "true";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 5000;

/// Default request body limit (1 MiB; notes are short text).
pub const REQUEST_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Default CORS origins for local frontends.
pub const ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

// =============================================================================
// DATABASE
// =============================================================================

/// Default PostgreSQL URL.
pub const DATABASE_URL: &str = "postgres://localhost/jotter";

/// Default maximum number of pooled connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// SESSIONS
// =============================================================================

/// Prefix of issued bearer tokens.
pub const SESSION_TOKEN_PREFIX: &str = "jt_";

/// Random characters after the prefix.
pub const SESSION_TOKEN_LENGTH: usize = 48;

/// Default session lifetime in hours (7 days).
pub const SESSION_LIFETIME_HOURS: i64 = 24 * 7;

// =============================================================================
// CLIENT
// =============================================================================

/// Per-request timeout of the HTTP client in seconds.
pub const CLIENT_TIMEOUT_SECS: u64 = 30;

/// Timeout of the client's health probe in seconds.
pub const CLIENT_HEALTH_TIMEOUT_SECS: u64 = 5;
