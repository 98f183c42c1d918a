//! Resource existence service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod query;
pub mod resolver;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use query::{ExistenceQuery, QueryDefaults, WildcardExpansion};
pub use resolver::{ClusterStateResolver, ExistenceResolver};
