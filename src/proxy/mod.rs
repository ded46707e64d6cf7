//! `POST /api/proxy` handler and the forwarding client behind it.
//!
//! [`proxy_handler`] decodes the JSON envelope sent by clients, hands the
//! resulting [`ProxyRequest`] to the shared [`Forwarder`], and encodes the
//! upstream [`ProxyResponse`] back as JSON. Submodules hold the outbound
//! call ([`forward`]) and header merging ([`headers`]).

pub mod forward;
pub mod headers;

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::server::AppState;

pub use forward::{Forwarder, ProxyRequest, ProxyResponse, ALLOWED_METHODS, FORWARD_TIMEOUT};

const CORRELATION_HEADER: &str = "x-correlation-id";

/// Wire form of a proxy request.
#[derive(Debug, Deserialize)]
pub struct ProxyEnvelope {
    pub service: String,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Any JSON value, kept as the exact bytes the client sent.
    #[serde(default)]
    pub body: Option<Box<RawValue>>,
}

impl From<ProxyEnvelope> for ProxyRequest {
    fn from(envelope: ProxyEnvelope) -> Self {
        Self {
            service: envelope.service,
            method: envelope.method,
            path: envelope.path,
            headers: envelope.headers.unwrap_or_default(),
            body: envelope
                .body
                .map(|raw| Bytes::copy_from_slice(raw.get().as_bytes())),
        }
    }
}

pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let envelope: ProxyEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(correlation_id = %correlation_id, error = %e, "invalid request body");
            return (StatusCode::BAD_REQUEST, "invalid request body").into_response();
        }
    };
    let request = ProxyRequest::from(envelope);

    tracing::info!(
        correlation_id = %correlation_id,
        service = %request.service,
        method = %request.method,
        path = %request.path,
        "proxying request"
    );

    let mut response = match state.forwarder.forward(&request).await {
        Ok(upstream) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                service = %request.service,
                status = upstream.status_code,
                "proxy successful"
            );
            Json(upstream).into_response()
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                correlation_id = %correlation_id,
                service = %request.service,
                method = %request.method,
                path = %request.path,
                error = %e,
                "proxy failed"
            );
            e.into_response()
        }
    };

    if let Ok(val) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_HEADER, val);
    }
    response
}
