//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the existence endpoint and the no-handler fallback
//! - Wire up middleware (request ID, tracing, metrics, timeout, concurrency limit)
//! - Bind server to listener and stop on the shutdown broadcast
//!
//! # Layer order (outermost first)
//! ```text
//! SetRequestId → Trace → PropagateRequestId → metrics → Timeout → concurrency slot → router
//! ```
//! The slot is awaited inside the request future rather than in `poll_ready`,
//! so the timeout covers time spent queued for it. The metrics layer sees
//! every status including 408s and extractor rejections.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::head;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::handlers::{exists_handler, no_handler};
use crate::http::request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
use crate::observability::metrics::track_requests;
use crate::resolver::{ExistenceResolver, TimeoutResolver};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn ExistenceResolver>,
    pub strict_params: bool,
}

/// HTTP server hosting the existence endpoint.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server backed by the given resolver.
    ///
    /// Resolver calls are bounded by `timeouts.resolver_secs`.
    pub fn new(config: ServiceConfig, resolver: Arc<dyn ExistenceResolver>) -> Self {
        let resolver_limit = Duration::from_secs(config.timeouts.resolver_secs);
        let state = AppState {
            resolver: Arc::new(TimeoutResolver::new(resolver, resolver_limit)),
            strict_params: config.security.strict_params,
        };
        Self {
            router: Self::build_router(&config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/{resource}", head(exists_handler))
            .fallback(no_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(
                Arc::new(Semaphore::new(config.listener.max_concurrent_requests)),
                limit_concurrency,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(track_requests))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.headers().request_id(),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Consume the server, returning the router (for in-process testing).
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Hold one of `max_concurrent_requests` slots while the request runs.
async fn limit_concurrency(
    State(slots): State<Arc<Semaphore>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match slots.acquire().await {
        Ok(_permit) => next.run(request).await,
        // Closed semaphore; never closed while the router is alive.
        Err(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
