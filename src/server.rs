//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the spec store,
//! the forwarding client, stats, and uptime), [`build_router`] for the
//! route table and middleware layers, [`build_http_client`] for the
//! connection-pooled hyper client, and [`shutdown_signal`] for
//! SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, post};
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::health::health_handler;
use crate::middleware::cors_layer;
use crate::proxy::{self, Forwarder};
use crate::specs;
use crate::store::SpecStore;

#[derive(Debug)]
pub struct Stats {
    pub forwarded: AtomicU64,
    pub failed: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub store: Arc<dyn SpecStore>,
    pub forwarder: Forwarder,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    /// Wire the store into a fresh forwarder sharing the given client.
    #[must_use]
    pub fn new(store: Arc<dyn SpecStore>, http_client: HttpClient) -> Self {
        Self {
            forwarder: Forwarder::new(http_client, Arc::clone(&store)),
            store,
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring`.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/specs", get(specs::list_specs))
        .route("/api/specs/{service}", get(specs::get_spec))
        .route("/api/proxy", post(proxy::proxy_handler))
        // Separate layer: CORS needs an axum body underneath and must see 413s
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
