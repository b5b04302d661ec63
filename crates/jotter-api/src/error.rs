//! HTTP error mapping.
//!
//! Every error body is `{"success": false, "message": ...}`. Unexpected
//! failures are logged in full and answered with a generic message.

use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use jotter_core::MessageResponse;

use crate::services::EmptyTrashError;

/// Message for any note that does not exist or belongs to someone else.
pub const NOTE_NOT_FOUND: &str = "Note not found";

/// Message for unexpected failures.
pub const SERVER_ERROR: &str = "Server error";

#[derive(Debug)]
pub enum ApiError {
    /// Unexpected failure; detail is logged, never sent.
    Internal(String),
    Unauthorized(String),
    NotFound,
    BadRequest(String),
    /// Extractor rejection, keeping axum's status (400, 413, 415, ...).
    Rejected(StatusCode, String),
}

impl From<jotter_core::Error> for ApiError {
    fn from(err: jotter_core::Error) -> Self {
        match err {
            jotter_core::Error::NotFound(_) => ApiError::NotFound,
            jotter_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            jotter_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<EmptyTrashError> for ApiError {
    fn from(err: EmptyTrashError) -> Self {
        match err.source {
            jotter_core::Error::NotFound(_) | jotter_core::Error::InvalidInput(_) => {
                err.source.into()
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "non-string panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(detail) => {
                error!(subsystem = "api", error = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOTE_NOT_FOUND.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Rejected(status, msg) => (status, msg),
        };

        let body = Json(MessageResponse {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use uuid::Uuid;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_hides_detail() {
        let err: ApiError = jotter_core::Error::note_not_found(Uuid::new_v4()).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Note not found" })
        );
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request_with_message() {
        let err: ApiError =
            jotter_core::Error::InvalidInput("Title and content are required".to_string()).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Title and content are required");
    }

    #[tokio::test]
    async fn test_internal_errors_are_generic() {
        let err: ApiError = jotter_core::Error::Internal("pool exhausted".to_string()).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server error");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_panic_payload_is_hidden() {
        let response = panic_response(Box::new("row decode failed"));
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Server error" })
        );
    }

    #[tokio::test]
    async fn test_rejection_keeps_status() {
        let (status, body) = body_json(ApiError::Rejected(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`".to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_empty_trash_failure_is_server_error() {
        let err: ApiError = EmptyTrashError {
            deleted: 2,
            source: jotter_core::Error::Internal("down".to_string()),
        }
        .into();
        let (status, _) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
