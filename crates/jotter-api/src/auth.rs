//! Bearer-token authentication.
//!
//! The service never issues credentials itself; it resolves an opaque
//! `Authorization: Bearer <token>` into a [`UserId`] through the configured
//! [`IdentityResolver`].

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{debug, warn};
use uuid::Uuid;

use jotter_core::{AuthPrincipal, Error, IdentityResolver, Result, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for the optional caller identity.
#[derive(Debug, Clone)]
pub struct Auth {
    pub principal: AuthPrincipal,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let principal = match token {
            Some(token) => match state.identity.resolve(token).await {
                Ok(Some(user_id)) => AuthPrincipal::User { user_id },
                Ok(None) => AuthPrincipal::Anonymous,
                Err(e) => {
                    warn!(
                        subsystem = "auth",
                        component = "extractor",
                        error = %e,
                        "Identity resolution failed"
                    );
                    return Err(e.into());
                }
            },
            None => AuthPrincipal::Anonymous,
        };

        Ok(Auth { principal })
    }
}

/// Extractor that requires a resolved user.
#[derive(Debug, Clone)]
pub struct RequireAuth {
    pub user_id: UserId,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth = Auth::from_request_parts(parts, state).await?;

        match auth.principal.user_id() {
            Some(user_id) => Ok(RequireAuth { user_id }),
            None => Err(ApiError::Unauthorized(
                "Authentication required".to_string(),
            )),
        }
    }
}

/// Fixed token table for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }

    /// Parse `token:uuid` pairs separated by commas, as in
    /// `AUTH_STATIC_TOKENS=alice-token:0190...,bob-token:0190...`.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut resolver = Self::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, user) = entry.rsplit_once(':').ok_or_else(|| {
                Error::Config(format!("Static token entry '{}' is not token:uuid", entry))
            })?;
            let token = token.trim();
            if token.is_empty() {
                return Err(Error::Config("Static token must not be empty".to_string()));
            }
            let user_id = Uuid::parse_str(user.trim()).map_err(|e| {
                Error::Config(format!("Static token user '{}' is not a UUID: {}", user, e))
            })?;
            resolver = resolver.with_token(token, UserId(user_id));
        }
        debug!(
            subsystem = "auth",
            component = "static_tokens",
            token_count = resolver.len(),
            "Static tokens loaded"
        );
        Ok(resolver)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for StaticTokenResolver {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>> {
        Ok(self.tokens.get(token).copied())
    }
}
