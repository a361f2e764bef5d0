//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use edgechat_types::error::StoreError;

use super::response::{ApiResponse, request_id};

/// Application-level error that maps to HTTP responses.
///
/// Backend failures never reach this type: the orchestrator turns them
/// into an assistant reply.
#[derive(Debug)]
pub enum AppError {
    /// Message store errors.
    Store(StoreError),
    /// Invalid request input.
    Validation(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Store(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Store(e @ StoreError::Connection(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", e.to_string())
            }
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        }
        (status, Json(ApiResponse::error(code, &message, request_id()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_status() {
        let cases = [
            (StoreError::InvalidRole("tool".into()), StatusCode::BAD_REQUEST),
            (StoreError::Connection("refused".into()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Query("syntax".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (StoreError::Decode("bad row".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn validation_is_bad_request() {
        let resp = AppError::Validation("empty id".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
