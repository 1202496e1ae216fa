//! Shared API types
//!
//! Error responses carry `{ "error": <message> }` with an optional
//! `details` field holding the underlying error text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::upstream::UpstreamError;
use crate::domain::listings::{FilterError, ListingError};

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        message: String,
        details: Option<String>,
    },
    Internal {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            details: None,
        }
    }

    pub fn internal_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Recent-listings feed failure; the body omits the cause
    pub fn from_feed(e: UpstreamError) -> Self {
        tracing::error!(error = %e, "Failed to fetch listings");
        Self::internal("Failed to fetch listings")
    }

    /// Filtered search failure
    pub fn from_search(e: ListingError) -> Self {
        match e {
            ListingError::Filter(e) => Self::from_filter(e),
            ListingError::Upstream(e) => {
                tracing::error!(error = %e, "Failed to fetch from Spark API");
                Self::internal_with_details("Failed to fetch from Spark API", e.to_string())
            }
        }
    }

    fn from_filter(e: FilterError) -> Self {
        tracing::warn!(error = %e, "Rejected filter request");
        Self::bad_request("Invalid filter parameter", e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            Self::BadRequest { message, details } => (StatusCode::BAD_REQUEST, message, details),
            Self::Internal { message, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, details)
            }
        };
        (status, Json(ErrorBody { error, details })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_feed_error_has_no_details() {
        let err = ApiError::from_feed(UpstreamError::Decode("bad".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to fetch listings"}));
    }

    #[tokio::test]
    async fn test_search_upstream_error_has_details() {
        let err = ApiError::from_search(ListingError::Upstream(UpstreamError::Status {
            status: 401,
            reason: "Unauthorized".into(),
        }));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch from Spark API");
        assert!(body["details"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn test_filter_error_is_bad_request() {
        let err = ApiError::from_search(ListingError::Filter(FilterError::InvalidNumber {
            param: "min",
            value: "abc".into(),
        }));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid filter parameter");
        assert_eq!(
            body["details"],
            "Parameter 'min' must be a number, got 'abc'"
        );
    }
}
