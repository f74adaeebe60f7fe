/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream rate limited (HTTP 429)")]
    RateLimited,
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),
    #[error("snapshot file not found: {0}")]
    MissingSnapshot(String),
    #[error("state data unavailable: {0}")]
    Unavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    /// Stable error code, also used to annotate snapshot fallback provenance
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Network(e) => {
                if e.is_timeout() {
                    "UPSTREAM_TIMEOUT"
                } else {
                    "UPSTREAM_UNREACHABLE"
                }
            }
            ApiError::RateLimited => "UPSTREAM_429",
            ApiError::UpstreamStatus(status) => match status {
                403 => "UPSTREAM_403",
                404 => "UPSTREAM_404",
                500..=599 => "UPSTREAM_5XX",
                _ => "UPSTREAM_ERROR",
            },
            ApiError::MissingSnapshot(_) => "MISSING_SNAPSHOT",
            ApiError::Unavailable(_) => "UNAVAILABLE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Io(_) => "IO_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) | ApiError::MissingSnapshot(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Network(_) | ApiError::RateLimited | ApiError::UpstreamStatus(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Io(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            // The not-found body stays minimal for API compatibility
            ApiError::NotFound(_) => ErrorResponse {
                error: "not found".to_string(),
                code: None,
            },
            _ => ErrorResponse {
                error: self.to_string(),
                code: Some(self.code().to_string()),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_code() {
        assert_eq!(ApiError::RateLimited.code(), "UPSTREAM_429");
    }

    #[test]
    fn test_upstream_status_codes() {
        assert_eq!(ApiError::UpstreamStatus(403).code(), "UPSTREAM_403");
        assert_eq!(ApiError::UpstreamStatus(502).code(), "UPSTREAM_5XX");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
