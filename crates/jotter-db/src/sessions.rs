//! Bearer session repository.
//!
//! Tokens are random strings handed to the client once. Only their SHA-256
//! hex digest is stored in `user_session`.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use jotter_core::{defaults, new_v7, Error, IdentityResolver, Result, UserId};

/// A freshly issued session. `token` is not recoverable after this point.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: chrono::DateTime<Utc>,
}

/// PostgreSQL implementation of session issuance and resolution.
pub struct PgSessionRepository {
    pool: Pool<Postgres>,
}

impl PgSessionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random string.
    fn generate_secret(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Hash a token using SHA256.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Mint a new bearer token for `user_id`, valid for `lifetime`.
    pub async fn issue(&self, user_id: UserId, lifetime: Duration) -> Result<IssuedSession> {
        let token = format!(
            "{}{}",
            defaults::SESSION_TOKEN_PREFIX,
            Self::generate_secret(defaults::SESSION_TOKEN_LENGTH)
        );
        let expires_at = Utc::now() + lifetime;

        sqlx::query(
            "INSERT INTO user_session (id, token_hash, user_id, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(new_v7())
        .bind(Self::hash_token(&token))
        .bind(user_id.as_uuid())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "auth",
            component = "sessions",
            op = "issue",
            user_id = %user_id,
            "Issued session token"
        );

        Ok(IssuedSession {
            token,
            user_id,
            expires_at,
        })
    }

    /// Issue a token with the default lifetime.
    pub async fn issue_default(&self, user_id: UserId) -> Result<IssuedSession> {
        self.issue(user_id, Duration::hours(defaults::SESSION_LIFETIME_HOURS))
            .await
    }

    /// Revoke a token. Returns whether an active session was revoked.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE user_session SET revoked = TRUE WHERE token_hash = $1 AND revoked = FALSE",
        )
        .bind(Self::hash_token(token))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete expired and revoked sessions. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM user_session WHERE revoked = TRUE OR expires_at <= $1")
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl IdentityResolver for PgSessionRepository {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>> {
        let row = sqlx::query(
            "SELECT user_id FROM user_session
             WHERE token_hash = $1 AND revoked = FALSE AND expires_at > $2",
        )
        .bind(Self::hash_token(token))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let user = row.map(|r| UserId(r.get("user_id")));
        if user.is_none() {
            debug!(
                subsystem = "auth",
                component = "sessions",
                op = "resolve",
                "Token did not resolve"
            );
        }
        Ok(user)
    }
}
