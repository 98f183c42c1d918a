//! Catalog-backed cluster-state resolver.
//!
//! # Responsibilities
//! - Keep the authoritative catalog snapshot and a node-local cached copy
//! - Answer `local` checks from the cache, others from the authoritative state
//! - Expose swappable query defaults (reloaded with the config)
//!
//! # Design Decisions
//! - Snapshots live behind `ArcSwap`, so readers never block a publish
//! - A non-local read refreshes the local cache with what it observed
//! - Before the first publish every check fails with `NotRecovered`

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use futures_util::future::{self, BoxFuture, FutureExt};

use crate::observability::metrics;
use crate::query::{ExistenceQuery, QueryDefaults};
use crate::resolver::catalog::Catalog;
use crate::resolver::{ExistenceResolver, ResolverError, ResolverResult};

/// In-process cluster state.
pub struct ClusterStateResolver {
    authoritative: ArcSwapOption<Catalog>,
    local: ArcSwapOption<Catalog>,
    defaults: ArcSwap<QueryDefaults>,
}

impl ClusterStateResolver {
    /// Create a resolver with no published state.
    pub fn new(defaults: QueryDefaults) -> Self {
        Self {
            authoritative: ArcSwapOption::empty(),
            local: ArcSwapOption::empty(),
            defaults: ArcSwap::from_pointee(defaults),
        }
    }

    /// Replace the authoritative catalog.
    ///
    /// The first publish also seeds the local cache; later ones reach it on
    /// the next non-local read or an explicit [`refresh_local`](Self::refresh_local).
    pub fn publish(&self, catalog: Catalog) {
        let resources = catalog.len();
        let catalog = Arc::new(catalog);
        if self.local.load().is_none() {
            self.local.store(Some(catalog.clone()));
        }
        self.authoritative.store(Some(catalog));
        metrics::record_catalog_size(resources);
        tracing::info!(resources, "Published cluster state");
    }

    /// Copy the authoritative snapshot into the local cache.
    pub fn refresh_local(&self) {
        self.local.store(self.authoritative.load_full());
    }

    pub fn set_defaults(&self, defaults: QueryDefaults) {
        self.defaults.store(Arc::new(defaults));
    }

    fn check(&self, query: &ExistenceQuery) -> ResolverResult<bool> {
        let snapshot = if query.local() {
            self.local.load_full()
        } else {
            let current = self.authoritative.load_full();
            if current.is_some() {
                self.local.store(current.clone());
            }
            current
        };

        let catalog = snapshot.ok_or(ResolverError::NotRecovered)?;
        let exists = catalog.exists(query);

        tracing::debug!(
            patterns = ?query.patterns(),
            expansion = %query.expansion(),
            local = query.local(),
            exists,
            "Resolved existence check"
        );
        Ok(exists)
    }
}

impl Default for ClusterStateResolver {
    fn default() -> Self {
        Self::new(QueryDefaults::default())
    }
}

impl ExistenceResolver for ClusterStateResolver {
    fn defaults(&self) -> QueryDefaults {
        **self.defaults.load()
    }

    fn exists<'a>(&'a self, query: &'a ExistenceQuery) -> BoxFuture<'a, ResolverResult<bool>> {
        future::ready(self.check(query)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::WildcardExpansion;
    use crate::resolver::ResourceEntry;

    fn query(patterns: &[&str], local: bool) -> ExistenceQuery {
        ExistenceQuery::new(
            patterns.iter().map(|p| p.to_string()).collect(),
            WildcardExpansion::ALL,
            local,
        )
    }

    #[tokio::test]
    async fn test_not_recovered_before_publish() {
        let resolver = ClusterStateResolver::default();
        assert_eq!(
            resolver.exists(&query(&["a"], false)).await,
            Err(ResolverError::NotRecovered)
        );
        assert_eq!(
            resolver.exists(&query(&["a"], true)).await,
            Err(ResolverError::NotRecovered)
        );
    }

    #[tokio::test]
    async fn test_local_reads_cached_snapshot() {
        let resolver = ClusterStateResolver::default();
        resolver.publish(Catalog::new([ResourceEntry::open("alpha")]));
        assert_eq!(resolver.exists(&query(&["alpha"], true)).await, Ok(true));

        resolver.publish(Catalog::new([ResourceEntry::open("beta")]));
        // Cache still holds the first snapshot.
        assert_eq!(resolver.exists(&query(&["beta"], true)).await, Ok(false));
        assert_eq!(resolver.exists(&query(&["beta"], false)).await, Ok(true));
        // The authoritative read refreshed the cache.
        assert_eq!(resolver.exists(&query(&["beta"], true)).await, Ok(true));
    }

    #[tokio::test]
    async fn test_refresh_local() {
        let resolver = ClusterStateResolver::default();
        resolver.publish(Catalog::default());
        resolver.publish(Catalog::new([ResourceEntry::open("alpha")]));
        assert_eq!(resolver.exists(&query(&["alpha"], true)).await, Ok(false));

        resolver.refresh_local();
        assert_eq!(resolver.exists(&query(&["alpha"], true)).await, Ok(true));
    }

    #[test]
    fn test_defaults_are_swappable() {
        let resolver = ClusterStateResolver::default();
        assert_eq!(resolver.defaults(), QueryDefaults::default());

        let updated = QueryDefaults {
            expansion: WildcardExpansion::OPEN,
            local: true,
        };
        resolver.set_defaults(updated);
        assert_eq!(resolver.defaults(), updated);
    }
}
