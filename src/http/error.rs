//! Generic error rendering.
//!
//! Every failure that is not an existence answer ends up here: malformed
//! requests before dispatch, resolver failures after it, and requests no
//! route accepts.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::query::MalformedRequest;
use crate::resolver::ResolverError;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Malformed(#[from] MalformedRequest),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("no handler found for uri [{uri}] and method [{method}]")]
    NoHandler { uri: String, method: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) | ApiError::NoHandler { .. } => StatusCode::BAD_REQUEST,
            ApiError::Resolver(ResolverError::NotRecovered) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Resolver(ResolverError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Resolver(ResolverError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::Malformed(_) | ApiError::NoHandler { .. } => "illegal_argument_exception",
            ApiError::Resolver(ResolverError::NotRecovered) => "cluster_block_exception",
            ApiError::Resolver(ResolverError::Timeout { .. }) => "timeout_exception",
            ApiError::Resolver(ResolverError::Internal(_)) => "resolver_exception",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Existence check failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Rejected existence request");
        }

        let body = json!({
            "error": {
                "type": self.error_type(),
                "reason": self.to_string(),
            },
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = MalformedRequest::ExpandWildcards("bogus".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::NoHandler {
            uri: "/".into(),
            method: "HEAD".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = ResolverError::NotRecovered.into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err: ApiError = ResolverError::Timeout { secs: 1 }.into();
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);

        let err: ApiError = ResolverError::Internal("boom".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_body() {
        let err: ApiError = MalformedRequest::ExpandWildcards("bogus".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"]["reason"], "No valid expand wildcard value [bogus]");
    }

    #[tokio::test]
    async fn test_no_handler_body() {
        let err = ApiError::NoHandler {
            uri: "/alpha/extra".into(),
            method: "HEAD".into(),
        };
        let bytes = axum::body::to_bytes(err.into_response().into_body(), 4096)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["type"], "illegal_argument_exception");
        assert_eq!(
            body["error"]["reason"],
            "no handler found for uri [/alpha/extra] and method [HEAD]"
        );
    }
}
