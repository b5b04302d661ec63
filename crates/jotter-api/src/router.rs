//! Route table and middleware stack.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use jotter_core::defaults;

use crate::config::ServerConfig;
use crate::error::panic_response;
use crate::handlers::{notes, system};
use crate::state::AppState;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse a comma-separated CORS origin whitelist, skipping invalid entries.
///
/// An empty list falls back to the local development origins.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    let source = if origins.trim().is_empty() {
        defaults::ALLOWED_ORIGINS
    } else {
        origins
    };

    source
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Build the application router with all layers applied.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins(
            &config.allowed_origins,
        )))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health_check))
        .route("/openapi.json", get(system::openapi_json))
        .route("/api/notes", post(notes::create_note).get(notes::list_notes))
        .route("/api/notes/trash", delete(notes::empty_trash))
        .route(
            "/api/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::soft_delete_note),
        )
        .route("/api/notes/:id/pin", put(notes::toggle_pin))
        .route("/api/notes/:id/archive", put(notes::toggle_archive))
        .route("/api/notes/:id/restore", put(notes::restore_note))
        .route(
            "/api/notes/:id/permanent",
            delete(notes::permanent_delete_note),
        )
        .fallback(system::route_not_found)
        .layer(DefaultBodyLimit::max(config.request_body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins("https://a.example, ,http://localhost:5173");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://a.example");
    }

    #[test]
    fn test_parse_allowed_origins_empty_uses_defaults() {
        let origins = parse_allowed_origins("  ");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "http://localhost:3000");
    }

    #[test]
    fn test_parse_allowed_origins_skips_invalid() {
        let origins = parse_allowed_origins("http://ok.example,bad\nvalue");
        assert_eq!(origins.len(), 1);
    }
}
