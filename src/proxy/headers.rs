//! Outbound header merging and upstream header capture.
//!
//! [`build_outbound_headers`] layers the service's configured auth headers
//! under the caller-supplied headers, so a request can override the default
//! credentials for a single call. [`collect_response_headers`] flattens an
//! upstream [`HeaderMap`] into the name → values mapping returned to clients.

use std::collections::{BTreeMap, HashMap};

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};

const DEFAULT_CONTENT_TYPE: &str = "application/json";

pub fn build_outbound_headers(
    auth_headers: Option<&HashMap<String, String>>,
    request_headers: &HashMap<String, String>,
    has_body: bool,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(auth_headers) = auth_headers {
        apply(&mut headers, auth_headers, "authHeaders");
    }

    // Request headers override auth headers
    apply(&mut headers, request_headers, "request headers");

    if has_body && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }

    headers
}

fn apply(headers: &mut HeaderMap, source: &HashMap<String, String>, label: &'static str) {
    for (key, value) in source {
        match (key.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            (Ok(name), Ok(val)) => {
                headers.insert(name, val);
            }
            _ => {
                tracing::warn!(header = %key, source = label, "invalid header name or value, skipping");
            }
        }
    }
}

/// Every upstream header, keeping all values of a repeated header in order.
#[must_use]
pub fn collect_response_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut collected = BTreeMap::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        collected.insert(name.as_str().to_string(), values);
    }
    collected
}
