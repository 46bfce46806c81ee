//! API error type

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Errors returned by view API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request or command not allowed in the current state (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Backend fetch failed (502)
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<airrank_common::Error> for ApiError {
    fn from(err: airrank_common::Error) -> Self {
        use airrank_common::Error;

        let message = err.to_string();
        match err {
            Error::InvalidInput(_) | Error::InvalidState(_) | Error::InvalidMetricInput(_) => {
                ApiError::BadRequest(message)
            }
            e if e.is_fetch_failure() => ApiError::Upstream(message),
            _ => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        if status.is_server_error() {
            warn!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use airrank_common::Error;

    #[test]
    fn test_error_classification() {
        assert!(matches!(
            ApiError::from(Error::InvalidState("x".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(Error::HttpStatus {
                status: 503,
                url: "http://x".into()
            }),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(Error::Decode("bad".into())),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(Error::Internal("x".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let response = ApiError::Upstream("down".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = ApiError::BadRequest("no".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
