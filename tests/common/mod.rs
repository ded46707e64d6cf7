//! Shared helpers for integration tests: a live gateway and a mock backend.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{any, get};
use axum::{Json, Router};

use specgate::server::{self, AppState};
use specgate::store::SpecStore;

pub async fn start_gateway(
    store: Arc<dyn SpecStore>,
) -> (SocketAddr, Arc<AppState>, tokio::sync::oneshot::Sender<()>) {
    start_gateway_with_limit(store, 1_048_576).await
}

pub async fn start_gateway_with_limit(
    store: Arc<dyn SpecStore>,
    max_body: usize,
) -> (SocketAddr, Arc<AppState>, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState::new(store, server::build_http_client()));
    let router = server::build_router(Arc::clone(&state), max_body);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, state, shutdown_tx)
}

/// Mock backend.
///
/// - `/echo` answers 201 with the request body and a JSON content type.
/// - `/cookies` answers with two `set-cookie` headers.
/// - anything else answers 200 with a JSON description of the request.
pub struct Backend {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl Backend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn start_backend() -> Backend {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/echo", any(echo))
        .route("/cookies", get(cookies))
        .fallback(inspect)
        .with_state(Arc::clone(&hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Backend {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Backend that promises a 100-byte body, sends 3 bytes, then hangs up.
pub async fn start_truncating_backend() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\nabc")
                .await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

/// A listener that accepts connections but never answers. Keep the
/// returned listener alive for as long as the address is in use.
pub async fn silent_backend() -> (tokio::net::TcpListener, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, format!("http://{addr}"))
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn echo(State(hits): State<Arc<AtomicUsize>>, body: Bytes) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::CREATED,
        [("content-type", "application/json")],
        body,
    )
}

async fn cookies(State(hits): State<Arc<AtomicUsize>>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (
        AppendHeaders([(SET_COOKIE, "a=1"), (SET_COOKIE, "b=2")]),
        Json(serde_json::json!({"ok": true})),
    )
}

async fn inspect(
    State(hits): State<Arc<AtomicUsize>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<serde_json::Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    Json(serde_json::json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}
