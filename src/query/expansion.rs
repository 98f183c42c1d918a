//! Wildcard expansion policy.
//!
//! # Responsibilities
//! - Decide which state-tagged resources a wildcard pattern may match
//! - Parse the `expand_wildcards` token list
//!
//! # Design Decisions
//! - All four open/closed combinations are legal, so the policy is a plain
//!   immutable value with named constants instead of two mutable setters
//! - Tokens are applied left to right starting from `NONE`

use std::fmt;
use std::str::FromStr;

use crate::query::MalformedRequest;

/// Which resource states a wildcard expression is allowed to expand to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WildcardExpansion {
    open: bool,
    closed: bool,
}

impl WildcardExpansion {
    /// Wildcards match nothing.
    pub const NONE: Self = Self::new(false, false);
    /// Wildcards match open resources only.
    pub const OPEN: Self = Self::new(true, false);
    /// Wildcards match closed resources only.
    pub const CLOSED: Self = Self::new(false, true);
    /// Wildcards match resources in any state.
    pub const ALL: Self = Self::new(true, true);

    pub const fn new(open: bool, closed: bool) -> Self {
        Self { open, closed }
    }

    pub fn expand_open(&self) -> bool {
        self.open
    }

    pub fn expand_closed(&self) -> bool {
        self.closed
    }

    /// Parse a comma-separated token list (`open`, `closed`, `none`, `all`).
    ///
    /// An empty list yields [`WildcardExpansion::NONE`].
    pub fn parse_tokens(raw: &str) -> Result<Self, MalformedRequest> {
        let mut policy = Self::NONE;
        for token in split_list(raw) {
            policy = match token {
                "open" => Self::new(true, policy.closed),
                "closed" => Self::new(policy.open, true),
                "none" => Self::NONE,
                "all" => Self::ALL,
                other => return Err(MalformedRequest::ExpandWildcards(other.to_string())),
            };
        }
        Ok(policy)
    }
}

impl Default for WildcardExpansion {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromStr for WildcardExpansion {
    type Err = MalformedRequest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_tokens(s)
    }
}

impl fmt::Display for WildcardExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.open, self.closed) {
            (true, true) => f.write_str("open,closed"),
            (true, false) => f.write_str("open"),
            (false, true) => f.write_str("closed"),
            (false, false) => f.write_str("none"),
        }
    }
}

// Trailing empty items are dropped (`"open,"` is `["open"]`, `""` is empty);
// inner and leading ones are kept and rejected as tokens.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    let trimmed = raw.trim_end_matches(',');
    trimmed.split(',').filter(move |_| !trimmed.is_empty())
}
