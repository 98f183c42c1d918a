//! Cluster-state resolution subsystem.
//!
//! # Data Flow
//! ```text
//! ExistenceQuery
//!     → ExistenceResolver::exists (async)
//!         → ClusterStateResolver picks a snapshot (local cache or authoritative)
//!         → catalog.rs resolves names, aliases, wildcards, exclusions
//!     → Result<bool, ResolverError>
//! ```
//!
//! # Design Decisions
//! - The endpoint only sees the trait; any cluster-state service can sit behind it
//! - "Does not exist" is `Ok(false)`, never an error
//! - Retries, if any, live in the resolver implementation; the per-call
//!   deadline is the `TimeoutResolver` decorator

pub mod catalog;
pub mod cluster;
pub mod timeout;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::query::{ExistenceQuery, QueryDefaults};

pub use catalog::{Catalog, ResourceEntry, ResourceState};
pub use cluster::ClusterStateResolver;
pub use timeout::TimeoutResolver;

/// Failures surfaced by a resolver while answering an existence check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// No cluster state has been published yet.
    #[error("cluster state not recovered")]
    NotRecovered,

    /// The cluster-state service did not answer in time.
    #[error("cluster state request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("resolver failure: {0}")]
    Internal(String),
}

/// Result type for resolver operations.
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Answers whether every pattern of a query resolves to an existing resource.
pub trait ExistenceResolver: Send + Sync {
    /// Defaults applied to options a request leaves out.
    fn defaults(&self) -> QueryDefaults;

    fn exists<'a>(&'a self, query: &'a ExistenceQuery) -> BoxFuture<'a, ResolverResult<bool>>;
}
