//! Resource existence service.
//!
//! Answers `HEAD /{resource}` with 200 when every requested name, alias or
//! wildcard resolves to an existing resource and 404 when one does not.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌───────────────────────────────────────────────────────┐
//!                 │                  EXISTENCE SERVICE                    │
//!                 │                                                       │
//!   HEAD /a,b*    │  ┌─────────┐    ┌────────────┐    ┌───────────────┐   │
//!   ──────────────┼─▶│  http   │───▶│   query    │───▶│   resolver    │   │
//!                 │  │ server  │    │ normalizer │    │ cluster state │   │
//!                 │  └─────────┘    └────────────┘    └───────┬───────┘   │
//!                 │                                           │           │
//!   200 / 404     │  ┌─────────┐                              │           │
//!   ◀─────────────┼──│response │◀─────────── outcome ─────────┘           │
//!                 │  │projector│                                          │
//!                 │  └─────────┘                                          │
//!                 │                                                       │
//!                 │  config (+ hot reload) · observability · lifecycle    │
//!                 └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use resource_exists::config::watcher::ConfigWatcher;
use resource_exists::config::{load_config, ServiceConfig};
use resource_exists::lifecycle::signals::wait_for_signal;
use resource_exists::lifecycle::startup::{apply_reloads, build_resolver};
use resource_exists::lifecycle::Shutdown;
use resource_exists::observability::{logging, metrics};
use resource_exists::HttpServer;

#[derive(Parser)]
#[command(name = "resource-exists")]
#[command(about = "HTTP existence checks against cluster state", long_about = None)]
struct Args {
    /// Path to a TOML config file; watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "resource-exists starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_concurrent_requests = config.listener.max_concurrent_requests,
        request_timeout_secs = config.timeouts.request_secs,
        resolver_timeout_secs = config.timeouts.resolver_secs,
        resources = config.resources.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let resolver = Arc::new(build_resolver(&config)?);
    let shutdown = Shutdown::new();

    // Keep the watcher handle alive for the lifetime of the server.
    let _watcher = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            tokio::spawn(apply_reloads(resolver.clone(), updates, shutdown.subscribe()));
            Some(handle)
        }
        None => None,
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, resolver);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
