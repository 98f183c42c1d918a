//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses
//! - Check the resource list is resolvable (unique names, no alias clashes)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level: unknown level '{0}'")]
    InvalidLogLevel(String),

    #[error("defaults.expand_wildcards: {0}")]
    InvalidExpansion(String),

    #[error("resources: invalid resource name '{0}'")]
    InvalidName(String),

    #[error("resources: duplicate resource '{0}'")]
    DuplicateResource(String),

    #[error("resources: alias '{0}' collides with a resource name")]
    AliasCollision(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.listener.max_concurrent_requests == 0 {
        errors.push(ValidationError::Zero("listener.max_concurrent_requests"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.resolver_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.resolver_secs"));
    }

    if LevelFilter::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if let Err(e) = config.defaults.query_defaults() {
        errors.push(ValidationError::InvalidExpansion(e.to_string()));
    }

    let mut names = HashSet::new();
    for resource in &config.resources {
        if !is_valid_name(&resource.name) {
            errors.push(ValidationError::InvalidName(resource.name.clone()));
        }
        if !names.insert(resource.name.as_str()) {
            errors.push(ValidationError::DuplicateResource(resource.name.clone()));
        }
    }
    for alias in config.resources.iter().flat_map(|r| r.aliases.iter()) {
        if !is_valid_name(alias) {
            errors.push(ValidationError::InvalidName(alias.clone()));
        } else if names.contains(alias.as_str()) {
            errors.push(ValidationError::AliasCollision(alias.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if SocketAddr::from_str(value).is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

// Names must stay addressable by the request grammar.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "_all"
        && !name.starts_with(['-', '+'])
        && !name.contains([',', '*', '/'])
}
