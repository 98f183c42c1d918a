//! Existence endpoint handler and the fallback for unrouted requests.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, Uri};

use crate::http::error::ApiError;
use crate::http::request::RequestIdExt;
use crate::http::response::{project, WireResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::query::{check_params, normalize, RawParams};

/// `HEAD /{resource}`: answer 200 if every pattern resolves, 404 otherwise.
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<WireResponse, ApiError> {
    let raw = RawParams::from_pairs(Some(resource), pairs);
    check_exists(&state, &raw, uri.path(), headers.request_id()).await
}

/// Fallback for paths no route matches (`/`, `/alpha/`, `/alpha/extra`).
///
/// Answers 400 through the error path so a malformed path is never read as
/// "resource missing".
pub async fn no_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::NoHandler {
        uri: uri.path().to_string(),
        method: method.to_string(),
    }
}

async fn check_exists(
    state: &AppState,
    raw: &RawParams,
    path: &str,
    request_id: &str,
) -> Result<WireResponse, ApiError> {
    if state.strict_params {
        check_params(raw, path)?;
    }
    let query = normalize(raw, &state.resolver.defaults())?;

    tracing::debug!(
        request_id = %request_id,
        patterns = ?query.patterns(),
        expansion = %query.expansion(),
        local = query.local(),
        "Dispatching existence check"
    );

    let outcome = state.resolver.exists(&query).await;
    metrics::record_outcome(match &outcome {
        Ok(true) => "exists",
        Ok(false) => "missing",
        Err(_) => "error",
    });

    Ok(project(outcome)?)
}
