//! In-memory [`SpecStore`] assembled in code.
//!
//! Used by tests and by embedders that already hold their documents.
//! Like the file store it is immutable once handed out.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;

use super::{ServiceConfig, SpecStore};
use crate::error::StoreError;

#[derive(Debug, Default, Clone)]
pub struct InMemorySpecStore {
    documents: BTreeMap<String, Bytes>,
    configs: HashMap<String, ServiceConfig>,
}

impl InMemorySpecStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, service: impl Into<String>, document: impl Into<Bytes>) -> Self {
        self.documents.insert(service.into(), document.into());
        self
    }

    /// Register a proxy config. A config may exist without a document,
    /// which makes the service proxyable but not listable.
    #[must_use]
    pub fn with_config(mut self, service: impl Into<String>, config: ServiceConfig) -> Self {
        self.configs.insert(service.into(), config);
        self
    }
}

impl SpecStore for InMemorySpecStore {
    fn list(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    fn get(&self, service: &str) -> Result<Bytes, StoreError> {
        self.documents
            .get(service)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(service.to_string()))
    }

    fn get_config(&self, service: &str) -> Result<&ServiceConfig, StoreError> {
        self.configs
            .get(service)
            .ok_or_else(|| StoreError::NotFound(service.to_string()))
    }
}
