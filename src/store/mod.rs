//! Service document storage.
//!
//! Defines the [`SpecStore`] lookup trait consumed by the HTTP handlers and
//! the forwarding client, and the [`ServiceConfig`] extracted from each
//! document's `x-proxy-config` field. Two implementations are provided:
//! [`file::FileSpecStore`] loads a directory once at startup, and
//! [`memory::InMemorySpecStore`] is built programmatically.

pub mod file;
pub mod memory;

use std::collections::HashMap;

use bytes::Bytes;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::StoreError;

pub use file::FileSpecStore;
pub use memory::InMemorySpecStore;

/// Reserved top-level document field holding the proxy configuration.
pub const PROXY_CONFIG_FIELD: &str = "x-proxy-config";

/// How to reach and authenticate to a service's backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(rename = "baseURL")]
    pub base_url: String,

    #[serde(rename = "authHeaders", default)]
    pub auth_headers: Option<HashMap<String, String>>,
}

impl ServiceConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_headers: None,
        }
    }

    #[must_use]
    pub fn with_auth_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Read-only lookup over loaded service documents.
///
/// Implementations are populated once and never mutated afterwards, so
/// they can be shared across request tasks behind an `Arc` without locking.
pub trait SpecStore: Send + Sync {
    /// All service names in ascending order.
    fn list(&self) -> Vec<String>;

    /// Raw document bytes, exactly as loaded.
    fn get(&self, service: &str) -> Result<Bytes, StoreError>;

    /// Proxy configuration. Services without `x-proxy-config` are `NotFound`.
    fn get_config(&self, service: &str) -> Result<&ServiceConfig, StoreError>;

    /// Number of listed services that carry a proxy configuration.
    fn proxyable_count(&self) -> usize {
        self.list()
            .iter()
            .filter(|name| self.get_config(name).is_ok())
            .count()
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
