//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app that hands every request to the frozen router
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Swap in a new router when the configuration changes
//!
//! # Design Decisions
//! - The router lives behind `ArcSwap`; requests load a snapshot, reloads
//!   store a fully built replacement
//! - Axum's own routing is unused: a single fallback forwards everything

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{body::Body, extract::State, http::Request, response::Response};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ServiceConfig};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::routes::build_router;
use crate::lifecycle::Shutdown;
use crate::routing::Router;

/// Shared handle to the router currently serving requests.
pub type SharedRouter = Arc<ArcSwap<Router>>;

/// HTTP server for the router service.
pub struct HttpServer {
    app: axum::Router,
    router: SharedRouter,
}

impl HttpServer {
    /// Build the initial router and the Axum app around it.
    pub fn new(config: ServiceConfig) -> Result<Self, ConfigError> {
        let router = Arc::new(ArcSwap::from_pointee(build_router(&config)?));
        Ok(Self::with_router(router))
    }

    /// Serve an already-built router.
    pub fn with_router(router: SharedRouter) -> Self {
        let app = Self::build_app(router.clone());
        Self { app, router }
    }

    /// Build the Axum app with all middleware layers.
    fn build_app(router: SharedRouter) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(router)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request.request_id().unwrap_or("unknown"),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The Axum app, for in-process use.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// The router handle shared with the app.
    pub fn router(&self) -> SharedRouter {
        self.router.clone()
    }

    /// Build a router from `config` and make it live.
    ///
    /// On error the current router keeps serving.
    pub fn reload(&self, config: &ServiceConfig) -> Result<(), ConfigError> {
        reload_router(&self.router, config)
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `updates` are applied as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        updates: mpsc::UnboundedReceiver<ServiceConfig>,
        shutdown: Arc<Shutdown>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.router.load().routes().len(),
            "HTTP server starting"
        );

        let reloader = tokio::spawn(apply_updates(self.router.clone(), updates, shutdown.subscribe()));

        let mut stop = shutdown.subscribe();
        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build and store a new router.
pub fn reload_router(router: &SharedRouter, config: &ServiceConfig) -> Result<(), ConfigError> {
    let next = build_router(config)?;
    let routes = next.routes().len();
    router.store(Arc::new(next));
    tracing::info!(routes, "Router reloaded");
    Ok(())
}

async fn apply_updates(
    router: SharedRouter,
    mut updates: mpsc::UnboundedReceiver<ServiceConfig>,
    mut stop: tokio::sync::broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(config) => {
                    if let Err(e) = reload_router(&router, &config) {
                        tracing::error!(error = %e, "Reload rejected, keeping current routes");
                    }
                }
                None => break,
            },
            _ = stop.recv() => break,
        }
    }
}

/// Forward every request to the current router snapshot.
async fn dispatch_handler(State(router): State<SharedRouter>, request: Request<Body>) -> Response {
    let router = router.load_full();
    router.dispatch(request).await
}
