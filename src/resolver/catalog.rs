//! Resource catalog and name resolution.
//!
//! # Responsibilities
//! - Hold one immutable snapshot of known resources, their state and aliases
//! - Resolve exact names, aliases, `*` wildcards, `+`/`-` prefixes and `_all`
//!
//! # Design Decisions
//! - Resolution is strict: any unmatched name or wildcard makes the whole
//!   check false, as does an empty final set
//! - Explicit names match regardless of state; the expansion policy only
//!   filters what wildcards (and `_all`) expand to
//! - Globs support `*` only, no regex

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::schema::ResourceConfig;
use crate::query::{ExistenceQuery, WildcardExpansion};

const ALL: &str = "_all";

/// Lifecycle state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    #[default]
    Open,
    Closed,
}

impl ResourceState {
    fn visible_to(self, expansion: WildcardExpansion) -> bool {
        match self {
            ResourceState::Open => expansion.expand_open(),
            ResourceState::Closed => expansion.expand_closed(),
        }
    }
}

/// A single resource known to the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub name: String,
    pub state: ResourceState,
    pub aliases: Vec<String>,
}

impl ResourceEntry {
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ResourceState::Open,
            aliases: Vec::new(),
        }
    }

    pub fn closed(name: impl Into<String>) -> Self {
        Self {
            state: ResourceState::Closed,
            ..Self::open(name)
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

impl From<&ResourceConfig> for ResourceEntry {
    fn from(config: &ResourceConfig) -> Self {
        Self {
            name: config.name.clone(),
            state: config.state,
            aliases: config.aliases.clone(),
        }
    }
}

/// Immutable snapshot of the cluster's resources.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: BTreeMap<String, ResourceState>,
    aliases: BTreeMap<String, BTreeSet<String>>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = ResourceEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            for alias in entry.aliases {
                catalog
                    .aliases
                    .entry(alias)
                    .or_default()
                    .insert(entry.name.clone());
            }
            catalog.resources.insert(entry.name, entry.state);
        }
        catalog
    }

    pub fn from_config(resources: &[ResourceConfig]) -> Self {
        Self::new(resources.iter().map(ResourceEntry::from))
    }

    /// Number of resources, aliases excluded.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// True iff every pattern of the query resolves and the result is non-empty.
    pub fn exists(&self, query: &ExistenceQuery) -> bool {
        self.resolve(query.patterns(), query.expansion())
            .is_some_and(|resolved| !resolved.is_empty())
    }

    /// Concrete resource names the patterns resolve to, or `None` if any
    /// pattern is unavailable.
    pub fn resolve(
        &self,
        patterns: &[String],
        expansion: WildcardExpansion,
    ) -> Option<BTreeSet<&str>> {
        if patterns.is_empty() || (patterns.len() == 1 && patterns[0] == ALL) {
            return Some(self.visible(expansion).collect());
        }

        let mut resolved = BTreeSet::new();
        let mut wildcard_seen = false;

        for pattern in patterns {
            let (exclude, expr) = match pattern.strip_prefix('-') {
                Some(rest) if wildcard_seen => (true, rest),
                _ => (false, pattern.strip_prefix('+').unwrap_or(pattern)),
            };

            if exclude {
                let removed: BTreeSet<&str> = if is_wildcard(expr) {
                    self.expand_wildcard(expr, WildcardExpansion::ALL)
                } else {
                    self.expand_name(expr).unwrap_or_default()
                };
                resolved.retain(|name| !removed.contains(name));
                continue;
            }

            if !is_wildcard(expr) {
                resolved.extend(self.expand_name(expr)?);
                continue;
            }

            wildcard_seen = true;
            let matched = self.expand_wildcard(expr, expansion);
            if matched.is_empty() {
                return None;
            }
            resolved.extend(matched);
        }

        Some(resolved)
    }

    fn visible(&self, expansion: WildcardExpansion) -> impl Iterator<Item = &str> {
        self.resources
            .iter()
            .filter(move |(_, state)| state.visible_to(expansion))
            .map(|(name, _)| name.as_str())
    }

    fn expand_name(&self, name: &str) -> Option<BTreeSet<&str>> {
        if let Some((name, _)) = self.resources.get_key_value(name) {
            return Some(BTreeSet::from([name.as_str()]));
        }
        self.aliases
            .get(name)
            .map(|targets| targets.iter().map(String::as_str).collect())
    }

    fn expand_wildcard(&self, pattern: &str, expansion: WildcardExpansion) -> BTreeSet<&str> {
        let direct = self
            .visible(expansion)
            .filter(|name| simple_match(pattern, name));

        let via_alias = self
            .aliases
            .iter()
            .filter(|(alias, _)| simple_match(pattern, alias))
            .flat_map(|(_, targets)| targets.iter())
            .filter(|target| {
                self.resources
                    .get(*target)
                    .is_some_and(|state| state.visible_to(expansion))
            })
            .map(String::as_str);

        direct.chain(via_alias).collect()
    }
}

fn is_wildcard(expr: &str) -> bool {
    expr.contains('*')
}

/// Glob match where `*` stands for any run of characters.
pub fn simple_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, last) = match parts.as_slice() {
        [only] => return *only == text,
        [first, .., last] => (*first, *last),
        [] => return false,
    };

    if text.len() < first.len() + last.len() || !text.starts_with(first) || !text.ends_with(last) {
        return false;
    }

    let mut rest = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    true
}
