//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, request ID)
//! - Resolve each request to an origin and forward it
//! - Map resolution/forwarding failures to 403/500 responses
//!
//! # Design Decisions
//! - One process-wide RouteCache shared via Arc across all requests
//! - No timeout layer on proxied traffic: in-flight store and origin
//!   calls run to completion (transport defaults only)

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::error::ProxyError;
use crate::http::forward::{self, HttpClient};
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::{KeyResolver, RouteCache};
use crate::store::{FileStore, MemoryStore, RouteStore};

/// Application state injected into the proxy handler.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RouteCache>,
    pub resolver: Arc<KeyResolver>,
    pub client: HttpClient,
}

/// HTTP server for the key-multiplexing proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let store: Arc<dyn RouteStore> = match &config.store.path {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(MemoryStore::from_table(config.store.routes.clone())),
        };

        let cache = Arc::new(RouteCache::new(store, config.routing.default_key.clone()));
        let resolver = Arc::new(KeyResolver::new(&config.routing));
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            cache,
            resolver,
            client,
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until Ctrl-C or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler: resolve the routing key, then forward.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying request"
    );

    let (parts, body) = request.into_parts();

    let response = match handle(&state, parts, body).await {
        Ok(response) => response,
        Err(ProxyError::NoRoute) => {
            tracing::warn!(request_id = %request_id, path = %path, "No route found");
            ProxyError::NoRoute.into_response()
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, path = %path, error = %err, "Request failed");
            err.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

async fn handle(state: &AppState, parts: Parts, body: Body) -> Result<Response, ProxyError> {
    let route = state
        .resolver
        .resolve(&state.cache, &parts)
        .await?
        .ok_or(ProxyError::NoRoute)?;

    forward::forward(&state.client, &route, parts, body).await
}
