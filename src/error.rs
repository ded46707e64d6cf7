//! Error types for specgate.
//!
//! [`StoreError`] covers spec directory loading and lookups,
//! [`ForwardError`] covers a single proxied call, and [`SpecgateError`]
//! is the top-level error returned by CLI subcommands. The per-request
//! errors implement [`IntoResponse`] so handlers can return them directly.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Specs directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Invalid spec document {file}:\n  {source}")]
    InvalidDocument {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read spec document {file}: {source}")]
    ReadDocument {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Service not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ForwardError {
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Invalid target URL '{url}': {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Upstream unreachable: {source}")]
    UpstreamUnreachable {
        #[source]
        source: BoxError,
    },

    #[error("Failed to read upstream response: {source}")]
    UpstreamReadFailure {
        #[source]
        source: BoxError,
    },
}

impl ForwardError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidMethod(_) => StatusCode::BAD_REQUEST,
            Self::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTarget { .. }
            | Self::UpstreamUnreachable { .. }
            | Self::UpstreamReadFailure { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpecgateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: BoxError,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: BoxError,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),

    #[error("Spec validation failed: {0} problem(s)")]
    ValidationFailed(usize),
}
