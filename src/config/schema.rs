//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::query::{MalformedRequest, QueryDefaults, WildcardExpansion};
use crate::resolver::ResourceState;

/// Root configuration for the existence service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, in-flight request limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request validation settings.
    pub security: SecurityConfig,

    /// Defaults applied when a request omits an option.
    pub defaults: DefaultsConfig,

    /// Resources published as the initial cluster state.
    pub resources: Vec<ResourceConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9200").
    pub bind_address: String,

    /// Maximum requests in flight at once; further requests wait for a slot.
    pub max_concurrent_requests: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9200".to_string(),
            max_concurrent_requests: 10_000,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds; expiry answers 408.
    pub request_secs: u64,

    /// Deadline for a single resolver call in seconds; expiry answers 504.
    pub resolver_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            resolver_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Reject query parameters the endpoint does not recognize.
    pub strict_params: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            strict_params: true,
        }
    }
}

/// Resolver defaults for omitted request options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Expansion tokens, same grammar as the `expand_wildcards` parameter.
    pub expand_wildcards: String,

    /// Whether checks read only the locally cached state.
    pub local: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            expand_wildcards: "open,closed".to_string(),
            local: false,
        }
    }
}

impl DefaultsConfig {
    /// Parse into the defaults the resolver hands to the normalizer.
    pub fn query_defaults(&self) -> Result<QueryDefaults, MalformedRequest> {
        Ok(QueryDefaults {
            expansion: WildcardExpansion::parse_tokens(&self.expand_wildcards)?,
            local: self.local,
        })
    }
}

/// A resource in the initial cluster state.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    /// Unique resource name.
    pub name: String,

    /// Resource state (default: open).
    #[serde(default)]
    pub state: ResourceState,

    /// Alternative names resolving to this resource.
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9200");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.timeouts.resolver_secs, 10);
        assert_eq!(config.defaults.expand_wildcards, "open,closed");
        assert!(!config.defaults.local);
        assert!(config.security.strict_params);
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_minimal_toml() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [defaults]
            local = true

            [[resources]]
            name = "alpha"

            [[resources]]
            name = "beta"
            state = "closed"
            aliases = ["b"]
            "#,
        )
        .unwrap();

        assert!(config.defaults.local);
        assert_eq!(config.defaults.expand_wildcards, "open,closed");
        assert_eq!(config.resources.len(), 2);
        assert_eq!(config.resources[0].state, ResourceState::Open);
        assert_eq!(config.resources[1].state, ResourceState::Closed);
        assert_eq!(config.resources[1].aliases, vec!["b".to_string()]);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_query_defaults() {
        let defaults = DefaultsConfig::default().query_defaults().unwrap();
        assert_eq!(defaults, QueryDefaults::default());

        let config = DefaultsConfig {
            expand_wildcards: "open".into(),
            local: true,
        };
        let defaults = config.query_defaults().unwrap();
        assert_eq!(defaults.expansion, WildcardExpansion::OPEN);
        assert!(defaults.local);
    }
}
