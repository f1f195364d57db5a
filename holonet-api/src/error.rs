//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use holonet_core::error::HolonetError;

use crate::dto::ApiResponse;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, code)
    }

    /// Malformed character id.
    pub fn invalid_id() -> Self {
        Self::bad_request("Invalid character ID format", "INVALID_ID")
    }

    /// Search endpoint called without a query.
    pub fn missing_query() -> Self {
        Self::bad_request("Search query is required", "MISSING_QUERY")
    }

    /// Not found error.
    pub fn not_found(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, code)
    }

    /// Upstream failure, prefixed with what we were doing.
    pub fn dependency(context: &str, err: &HolonetError) -> Self {
        tracing::error!(error = %err, "{}", context);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}: {}", context, err),
            "SWAPI_ERROR",
        )
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_SERVER_ERROR")
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code of this error.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::failure(self.code, self.message);
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(ApiError::invalid_id().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::invalid_id().code(), "INVALID_ID");
        assert_eq!(ApiError::missing_query().code(), "MISSING_QUERY");
        assert_eq!(ApiError::internal("boom").code(), "INTERNAL_SERVER_ERROR");

        let err = ApiError::dependency("Failed to fetch characters", &HolonetError::no_response());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "SWAPI_ERROR");
    }

    #[test]
    fn test_dependency_message_keeps_upstream_detail() {
        let err = ApiError::dependency(
            "Failed to fetch character",
            &HolonetError::upstream_status(502, "Bad Gateway"),
        );
        assert_eq!(err.message, "Failed to fetch character: SWAPI Error: 502 - Bad Gateway");
    }
}
