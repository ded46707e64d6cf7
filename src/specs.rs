//! `GET /api/specs` and `GET /api/specs/{service}` handlers.
//!
//! Documents are served byte-for-byte as loaded. Each response carries a
//! strong `ETag` derived from the document's SHA-256 so clients can
//! revalidate with `If-None-Match`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::server::AppState;
use crate::store::sha256_hex;

pub async fn list_specs(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.store.list())
}

pub async fn get_spec(
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
    req_headers: HeaderMap,
) -> Response {
    let document = match state.store.get(&service) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(service = %service, "spec not found");
            return e.into_response();
        }
    };

    let etag = format!("\"{}\"", sha256_hex(&document));
    let etag_value = HeaderValue::from_str(&etag).ok();

    if if_none_match(&req_headers, &etag) {
        let mut response = StatusCode::NOT_MODIFIED.into_response();
        if let Some(val) = etag_value {
            response.headers_mut().insert(ETAG, val);
        }
        return response;
    }

    let mut response = (
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        document,
    )
        .into_response();
    if let Some(val) = etag_value {
        response.headers_mut().insert(ETAG, val);
    }
    response
}

/// Whether any `If-None-Match` entry matches `etag` (weak comparison).
fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}
