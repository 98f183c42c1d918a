//! Response projection.
//!
//! # Responsibilities
//! - Map an existence outcome onto a status-only response
//! - Hand resolver failures back untouched for generic error rendering
//!
//! # Design Decisions
//! - 200 for exists, 404 for missing, nothing else; no body ever
//! - Errors are never downgraded to 404

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::resolver::ResolverResult;

/// Content type sent with every existence answer.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Wire form of an existence answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireResponse {
    status: StatusCode,
}

impl WireResponse {
    pub fn exists() -> Self {
        Self {
            status: StatusCode::OK,
        }
    }

    pub fn missing() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &'static [u8] {
        &[]
    }

    pub fn content_type(&self) -> &'static str {
        TEXT_CONTENT_TYPE
    }
}

impl IntoResponse for WireResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
            Body::empty(),
        )
            .into_response()
    }
}

/// Project a resolver outcome onto the wire.
pub fn project(outcome: ResolverResult<bool>) -> ResolverResult<WireResponse> {
    outcome.map(|exists| {
        if exists {
            WireResponse::exists()
        } else {
            WireResponse::missing()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverError;

    #[test]
    fn test_boolean_mapping() {
        let found = project(Ok(true)).unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        assert!(found.body().is_empty());

        let missing = project(Ok(false)).unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert!(missing.body().is_empty());
        assert_eq!(missing.content_type(), TEXT_CONTENT_TYPE);
    }

    #[test]
    fn test_errors_pass_through_unchanged() {
        let err = ResolverError::Timeout { secs: 3 };
        assert_eq!(project(Err(err.clone())), Err(err));
    }

    #[tokio::test]
    async fn test_into_response_has_empty_text_body() {
        let response = WireResponse::missing().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            TEXT_CONTENT_TYPE
        );
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }
}
