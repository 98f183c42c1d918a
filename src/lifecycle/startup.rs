//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated config into a ready resolver
//! - Apply reloaded configs to the running resolver
//!
//! # Design Decisions
//! - Fail fast: an unusable config at startup is fatal
//! - A bad reload is logged and skipped; the previous state stays published

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::config::ServiceConfig;
use crate::query::MalformedRequest;
use crate::resolver::{Catalog, ClusterStateResolver};

/// Build a resolver with the config's defaults and initial cluster state.
pub fn build_resolver(config: &ServiceConfig) -> Result<ClusterStateResolver, MalformedRequest> {
    let resolver = ClusterStateResolver::new(config.defaults.query_defaults()?);
    resolver.publish(Catalog::from_config(&config.resources));
    Ok(resolver)
}

/// Publish a config's defaults and resources into a running resolver.
pub fn apply_config(
    resolver: &ClusterStateResolver,
    config: &ServiceConfig,
) -> Result<(), MalformedRequest> {
    let defaults = config.defaults.query_defaults()?;
    resolver.set_defaults(defaults);
    resolver.publish(Catalog::from_config(&config.resources));
    Ok(())
}

/// Apply config updates until shutdown or until the update channel closes.
pub async fn apply_reloads(
    resolver: Arc<ClusterStateResolver>,
    mut updates: mpsc::UnboundedReceiver<ServiceConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else { break };
                match apply_config(&resolver, &config) {
                    Ok(()) => tracing::info!(
                        resources = config.resources.len(),
                        "Applied reloaded configuration"
                    ),
                    Err(e) => tracing::error!(error = %e, "Rejected reloaded configuration"),
                }
            }
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!("Config reload task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceConfig;
    use crate::query::{ExistenceQuery, WildcardExpansion};
    use crate::resolver::{ExistenceResolver, ResourceState};

    fn config_with(names: &[&str]) -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.resources = names
            .iter()
            .map(|name| ResourceConfig {
                name: name.to_string(),
                state: ResourceState::Open,
                aliases: Vec::new(),
            })
            .collect();
        config
    }

    fn query(name: &str) -> ExistenceQuery {
        ExistenceQuery::new(vec![name.to_string()], WildcardExpansion::ALL, false)
    }

    #[tokio::test]
    async fn test_build_resolver_publishes_resources() {
        let resolver = build_resolver(&config_with(&["alpha"])).unwrap();
        assert_eq!(resolver.exists(&query("alpha")).await, Ok(true));
        assert_eq!(resolver.exists(&query("beta")).await, Ok(false));
    }

    #[tokio::test]
    async fn test_apply_reloads() {
        let resolver = Arc::new(build_resolver(&config_with(&["alpha"])).unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(apply_reloads(resolver.clone(), rx, shutdown_rx));

        let mut update = config_with(&["beta"]);
        update.defaults.local = true;
        tx.send(update).unwrap();

        let mut bad = config_with(&["gamma"]);
        bad.defaults.expand_wildcards = "bogus".into();
        tx.send(bad).unwrap();

        drop(tx);
        task.await.unwrap();
        drop(shutdown_tx);

        assert!(resolver.defaults().local);
        assert_eq!(resolver.exists(&query("beta")).await, Ok(true));
        assert_eq!(resolver.exists(&query("gamma")).await, Ok(false));
    }
}
