//! Unauthenticated service endpoints.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::OpenApi;

use jotter_core::MessageResponse;

use crate::openapi::ApiDoc;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness banner.
///
/// GET /
#[utoipa::path(get, path = "/", tag = "System",
    responses((status = 200, description = "API is running", body = MessageResponse)))]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Note Application API is running".to_string(),
    })
}

/// Health check.
///
/// GET /health
#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)))]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Generated OpenAPI document.
///
/// GET /openapi.json
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Envelope 404 for paths outside the route table.
pub async fn route_not_found() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse {
            success: false,
            message: "Route not found".to_string(),
        }),
    )
}
