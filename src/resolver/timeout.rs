//! Deadline for resolver calls.
//!
//! Wraps any [`ExistenceResolver`] so a cluster-state lookup that outlives
//! its budget fails with [`ResolverError::Timeout`] (rendered 504) instead of
//! hanging until the whole-request timeout fires.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};

use crate::query::{ExistenceQuery, QueryDefaults};
use crate::resolver::{ExistenceResolver, ResolverError, ResolverResult};

/// Resolver decorator enforcing a per-call deadline.
pub struct TimeoutResolver {
    inner: Arc<dyn ExistenceResolver>,
    limit: Duration,
}

impl TimeoutResolver {
    pub fn new(inner: Arc<dyn ExistenceResolver>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

impl ExistenceResolver for TimeoutResolver {
    fn defaults(&self) -> QueryDefaults {
        self.inner.defaults()
    }

    fn exists<'a>(&'a self, query: &'a ExistenceQuery) -> BoxFuture<'a, ResolverResult<bool>> {
        async move {
            match tokio::time::timeout(self.limit, self.inner.exists(query)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        patterns = ?query.patterns(),
                        limit_ms = self.limit.as_millis() as u64,
                        "Resolver call timed out"
                    );
                    Err(ResolverError::Timeout {
                        secs: self.limit.as_secs(),
                    })
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future;

    use crate::query::WildcardExpansion;

    struct Fixed(ResolverResult<bool>);

    impl ExistenceResolver for Fixed {
        fn defaults(&self) -> QueryDefaults {
            QueryDefaults {
                expansion: WildcardExpansion::OPEN,
                local: true,
            }
        }

        fn exists<'a>(&'a self, _query: &'a ExistenceQuery) -> BoxFuture<'a, ResolverResult<bool>> {
            future::ready(self.0.clone()).boxed()
        }
    }

    struct Stalled;

    impl ExistenceResolver for Stalled {
        fn defaults(&self) -> QueryDefaults {
            QueryDefaults::default()
        }

        fn exists<'a>(&'a self, _query: &'a ExistenceQuery) -> BoxFuture<'a, ResolverResult<bool>> {
            future::pending().boxed()
        }
    }

    fn query() -> ExistenceQuery {
        ExistenceQuery::new(vec!["alpha".into()], WildcardExpansion::ALL, false)
    }

    #[tokio::test]
    async fn test_answers_within_deadline_pass_through() {
        for answer in [Ok(true), Ok(false), Err(ResolverError::NotRecovered)] {
            let resolver =
                TimeoutResolver::new(Arc::new(Fixed(answer.clone())), Duration::from_secs(1));
            assert_eq!(resolver.exists(&query()).await, answer);
        }
    }

    #[tokio::test]
    async fn test_defaults_come_from_inner() {
        let resolver = TimeoutResolver::new(Arc::new(Fixed(Ok(true))), Duration::from_secs(1));
        assert_eq!(resolver.defaults().expansion, WildcardExpansion::OPEN);
        assert!(resolver.defaults().local);
    }

    #[tokio::test]
    async fn test_stalled_call_times_out() {
        let resolver = TimeoutResolver::new(Arc::new(Stalled), Duration::from_secs(1));
        assert_eq!(
            resolver.exists(&query()).await,
            Err(ResolverError::Timeout { secs: 1 })
        );
    }
}
