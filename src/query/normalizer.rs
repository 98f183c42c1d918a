//! Raw request parameters → [`ExistenceQuery`].

use std::collections::BTreeMap;

use crate::query::{ExistenceQuery, MalformedRequest, QueryDefaults, WildcardExpansion};

pub const PARAM_EXPAND_WILDCARDS: &str = "expand_wildcards";
pub const PARAM_LOCAL: &str = "local";
pub const PARAM_IGNORE_UNAVAILABLE: &str = "ignore_unavailable";
pub const PARAM_ALLOW_NO_INDICES: &str = "allow_no_indices";

/// Parameters consumed by the existence endpoint itself.
const ENDPOINT_PARAMS: &[&str] = &[
    PARAM_EXPAND_WILDCARDS,
    PARAM_LOCAL,
    PARAM_IGNORE_UNAVAILABLE,
    PARAM_ALLOW_NO_INDICES,
];

/// Parameters every endpoint tolerates.
const GLOBAL_PARAMS: &[&str] = &["pretty", "human", "error_trace", "filter_path"];

/// Request parameters exactly as the transport delivered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    resource: Option<String>,
    params: BTreeMap<String, String>,
}

impl RawParams {
    pub fn new(resource: Option<String>) -> Self {
        Self {
            resource,
            params: BTreeMap::new(),
        }
    }

    /// Add a query parameter. A repeated key keeps the last value.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn from_pairs<I, K, V>(resource: Option<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(resource), |raw, (k, v)| raw.with_param(k, v))
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }
}

/// Build the existence query for a request.
///
/// Options the caller omits fall back to `defaults` independently, so a
/// request may override only the locality or only the expansion policy.
pub fn normalize(
    raw: &RawParams,
    defaults: &QueryDefaults,
) -> Result<ExistenceQuery, MalformedRequest> {
    let patterns = split_names(raw.resource().unwrap_or_default())?;

    let expansion = match raw.param(PARAM_EXPAND_WILDCARDS) {
        Some(tokens) => WildcardExpansion::parse_tokens(tokens)?,
        None => defaults.expansion,
    };

    let local = param_as_bool(raw, PARAM_LOCAL, defaults.local)?;

    // Accepted for compatibility; existence checks always resolve strictly.
    param_as_bool(raw, PARAM_IGNORE_UNAVAILABLE, false)?;
    param_as_bool(raw, PARAM_ALLOW_NO_INDICES, false)?;

    Ok(ExistenceQuery::new(patterns, expansion, local))
}

/// Reject query parameters the endpoint does not understand.
pub fn check_params(raw: &RawParams, path: &str) -> Result<(), MalformedRequest> {
    match raw
        .param_names()
        .find(|name| !ENDPOINT_PARAMS.contains(name) && !GLOBAL_PARAMS.contains(name))
    {
        Some(param) => Err(MalformedRequest::UnrecognizedParameter {
            path: path.to_string(),
            param: param.to_string(),
        }),
        None => Ok(()),
    }
}

fn split_names(raw: &str) -> Result<Vec<String>, MalformedRequest> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let names: Vec<String> = raw.split(',').map(str::to_string).collect();
    if names.iter().any(String::is_empty) {
        return Err(MalformedRequest::EmptyName(raw.to_string()));
    }
    Ok(names)
}

// A bare `?local` counts as true.
fn param_as_bool(raw: &RawParams, key: &str, default: bool) -> Result<bool, MalformedRequest> {
    match raw.param(key) {
        None => Ok(default),
        Some("") | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(MalformedRequest::InvalidBoolean {
            param: key.to_string(),
            value: other.to_string(),
        }),
    }
}
