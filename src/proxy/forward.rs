//! Translation of a [`ProxyRequest`] into a single outbound call.
//!
//! The [`Forwarder`] validates the method, resolves the service's
//! [`ServiceConfig`](crate::store::ServiceConfig) through the shared
//! [`SpecStore`], joins `baseURL` and the request path verbatim, and
//! executes the call on the pooled HTTP client. Both request and response
//! bodies are fully buffered; there are no retries.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::uri::InvalidUri;
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Full};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use super::headers::{build_outbound_headers, collect_response_headers};
use crate::error::ForwardError;
use crate::server::HttpClient;
use crate::store::SpecStore;

/// Deadline for the whole outbound call, including the body read.
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(30);

pub const ALLOWED_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

#[derive(Debug, Clone, Default)]
pub struct ProxyRequest {
    pub service: String,
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    /// Pre-serialized JSON, sent as-is.
    pub body: Option<Bytes>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(serialize_with = "serialize_raw_body")]
    pub body: Bytes,
}

/// Embed the upstream body as raw JSON. Empty bodies become `null` and
/// non-JSON bodies are carried as a JSON string.
fn serialize_raw_body<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    if body.is_empty() {
        return serializer.serialize_none();
    }
    let text = String::from_utf8_lossy(body);
    match RawValue::from_string(text.clone().into_owned()) {
        Ok(raw) => raw.serialize(serializer),
        Err(_) => serializer.serialize_str(&text),
    }
}

#[derive(Clone)]
pub struct Forwarder {
    client: HttpClient,
    store: Arc<dyn SpecStore>,
}

impl Forwarder {
    #[must_use]
    pub fn new(client: HttpClient, store: Arc<dyn SpecStore>) -> Self {
        Self { client, store }
    }

    pub async fn forward(&self, request: &ProxyRequest) -> Result<ProxyResponse, ForwardError> {
        let method = parse_method(&request.method)?;

        let config = self
            .store
            .get_config(&request.service)
            .map_err(|_| ForwardError::ServiceNotFound(request.service.clone()))?;

        // No slash normalization between base and path
        let target = format!("{}{}", config.base_url, request.path);
        let uri: Uri = target
            .parse()
            .map_err(|e: InvalidUri| ForwardError::InvalidTarget {
                url: target.clone(),
                source: Box::new(e),
            })?;

        let body = request.body.clone().filter(|b| !b.is_empty());
        let headers = build_outbound_headers(
            config.auth_headers.as_ref(),
            &request.headers,
            body.is_some(),
        );

        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(outbound_headers) = builder.headers_mut() {
            outbound_headers.extend(headers);
        }
        let outbound = builder
            .body(Full::new(body.unwrap_or_default()))
            .map_err(|e| ForwardError::InvalidTarget {
                url: target.clone(),
                source: Box::new(e),
            })?;

        let start = Instant::now();
        let deadline = tokio::time::Instant::now() + FORWARD_TIMEOUT;

        let sent = tokio::time::timeout_at(deadline, self.client.request(outbound)).await;
        let response = match sent {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                return Err(ForwardError::UpstreamUnreachable {
                    source: Box::new(e),
                })
            }
            Err(_) => {
                return Err(ForwardError::UpstreamUnreachable {
                    source: format!("no response within {}s", FORWARD_TIMEOUT.as_secs()).into(),
                })
            }
        };

        let status = response.status();
        let headers = collect_response_headers(response.headers());

        let received = tokio::time::timeout_at(deadline, response.into_body().collect()).await;
        let body = match received {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) => {
                return Err(ForwardError::UpstreamReadFailure {
                    source: Box::new(e),
                })
            }
            Err(_) => {
                return Err(ForwardError::UpstreamReadFailure {
                    source: format!("body not received within {}s", FORWARD_TIMEOUT.as_secs())
                        .into(),
                })
            }
        };

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            service = %request.service,
            method = %request.method,
            target = %target,
            status = status.as_u16(),
            latency_ms,
            "upstream responded"
        );

        Ok(ProxyResponse {
            status_code: status.as_u16(),
            headers,
            body,
        })
    }
}

/// Accept only the uppercase methods in [`ALLOWED_METHODS`].
fn parse_method(method: &str) -> Result<Method, ForwardError> {
    if !ALLOWED_METHODS.contains(&method) {
        return Err(ForwardError::InvalidMethod(method.to_string()));
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|_| ForwardError::InvalidMethod(method.to_string()))
}
