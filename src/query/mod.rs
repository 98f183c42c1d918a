//! Existence query model and request normalization.
//!
//! # Data Flow
//! ```text
//! HEAD /{resource}?expand_wildcards=..&local=..
//!     → RawParams (path segment + query pairs, untouched)
//!     → normalizer.rs (split, parse tokens, apply resolver defaults)
//!     → ExistenceQuery (immutable, handed to the resolver)
//! ```
//!
//! # Design Decisions
//! - Normalization is pure: no I/O, same input always yields the same query
//! - Defaults are resolved here, never later inside the resolver
//! - Malformed input fails before any resolver call is made

pub mod expansion;
pub mod normalizer;

use thiserror::Error;

pub use expansion::WildcardExpansion;
pub use normalizer::{check_params, normalize, RawParams};

/// A fully resolved existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceQuery {
    patterns: Vec<String>,
    expansion: WildcardExpansion,
    local: bool,
}

impl ExistenceQuery {
    pub fn new(patterns: Vec<String>, expansion: WildcardExpansion, local: bool) -> Self {
        Self {
            patterns,
            expansion,
            local,
        }
    }

    /// Requested resource patterns, in request order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn expansion(&self) -> WildcardExpansion {
        self.expansion
    }

    /// Whether only the locally cached cluster state may be consulted.
    pub fn local(&self) -> bool {
        self.local
    }
}

/// The resolver's own defaults for options a caller may omit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub expansion: WildcardExpansion,
    pub local: bool,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            expansion: WildcardExpansion::ALL,
            local: false,
        }
    }
}

/// Client errors detected while normalizing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRequest {
    #[error("No valid expand wildcard value [{0}]")]
    ExpandWildcards(String),

    #[error("Failed to parse value [{value}] as only [true] or [false] are allowed for parameter [{param}]")]
    InvalidBoolean { param: String, value: String },

    #[error("resource name list [{0}] contains an empty name")]
    EmptyName(String),

    #[error("request [{path}] contains unrecognized parameter: [{param}]")]
    UnrecognizedParameter { path: String, param: String },
}
