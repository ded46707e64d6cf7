//! Specgate serves per-service OpenAPI documents and proxies calls to
//! the services they describe.
//!
//! At startup every `<service>.json` document in the specs directory is
//! loaded into memory. Documents that embed an `x-proxy-config` block
//! (`baseURL` plus optional `authHeaders`) become proxyable: clients post a
//! logical request to `/api/proxy` and specgate forwards it to the backend,
//! layering the configured credentials under the caller's headers.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, health).
//! - [`store`] -- The [`SpecStore`](store::SpecStore) lookup trait with
//!   file-backed and in-memory implementations.
//! - [`proxy`] -- The forwarding client and the `POST /api/proxy` handler.
//! - [`specs`] -- `GET /api/specs` and `GET /api/specs/{service}` handlers.
//! - [`error`] -- Error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- CORS policy applied to every route.
//! - [`server`] -- Axum router, shared application state, HTTP client, and
//!   graceful shutdown.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
pub mod specs;
pub mod store;
