//! Directory-backed [`SpecStore`] loaded once at startup.
//!
//! [`FileSpecStore::load`] reads every `*.json` file directly inside the
//! specs directory (no recursion), parses it, and extracts the optional
//! `x-proxy-config` block. Any unreadable or malformed document aborts the
//! whole load; a store is never returned half-populated.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use bytes::Bytes;

use super::{ServiceConfig, SpecStore, PROXY_CONFIG_FIELD};
use crate::error::StoreError;

const DOCUMENT_EXTENSION: &str = ".json";

#[derive(Debug)]
pub struct FileSpecStore {
    documents: BTreeMap<String, Bytes>,
    configs: HashMap<String, ServiceConfig>,
}

impl FileSpecStore {
    pub async fn load(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();

        match tokio::fs::metadata(&dir).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::DirectoryNotFound { path: dir });
            }
            Err(e) => return Err(StoreError::Io(e)),
        }

        let mut documents = BTreeMap::new();
        let mut configs = HashMap::new();

        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            let Some(service) = file_name.strip_suffix(DOCUMENT_EXTENSION) else {
                continue;
            };

            let raw = tokio::fs::read(entry.path())
                .await
                .map_err(|source| StoreError::ReadDocument {
                    file: file_name.to_string(),
                    source,
                })?;
            let config = parse_document(file_name, &raw)?;

            tracing::debug!(
                service = %service,
                proxyable = config.is_some(),
                "loaded spec document"
            );

            if let Some(config) = config {
                configs.insert(service.to_string(), config);
            }
            documents.insert(service.to_string(), Bytes::from(raw));
        }

        tracing::info!(
            dir = %dir.display(),
            services = documents.len(),
            proxyable = configs.len(),
            "spec store loaded"
        );

        Ok(Self {
            documents,
            configs,
        })
    }
}

/// Parse a document and pull out its proxy configuration, if any.
fn parse_document(file: &str, raw: &[u8]) -> Result<Option<ServiceConfig>, StoreError> {
    let invalid = |source| StoreError::InvalidDocument {
        file: file.to_string(),
        source,
    };

    let mut document: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(raw).map_err(invalid)?;

    document
        .remove(PROXY_CONFIG_FIELD)
        .map(|value| serde_json::from_value::<ServiceConfig>(value).map_err(invalid))
        .transpose()
}

impl SpecStore for FileSpecStore {
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

    fn proxyable_count(&self) -> usize {
        self.configs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_without_config_yields_none() {
        let config = parse_document("a.json", br#"{"openapi":"3.0.0"}"#).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn document_with_config_is_extracted() {
        let raw = br#"{"openapi":"3.0.0","x-proxy-config":{"baseURL":"http://a:1"}}"#;
        let config = parse_document("a.json", raw).unwrap().unwrap();
        assert_eq!(config.base_url, "http://a:1");
    }

    #[test]
    fn non_object_document_is_invalid() {
        let err = parse_document("list.json", b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument { ref file, .. } if file == "list.json"));
    }

    #[test]
    fn malformed_config_is_invalid() {
        let raw = br#"{"x-proxy-config":{"baseURL":["not","a","string"]}}"#;
        assert!(matches!(
            parse_document("bad.json", raw),
            Err(StoreError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn null_config_is_invalid() {
        let raw = br#"{"x-proxy-config":null}"#;
        assert!(parse_document("null.json", raw).is_err());
    }
}
