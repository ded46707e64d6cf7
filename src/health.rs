//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, loaded service counts, and cumulative proxy
//! statistics.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub commit: String,
    pub uptime_seconds: u64,
    pub services: ServicesHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct ServicesHealth {
    pub total: usize,
    pub proxyable: usize,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_forwarded: u64,
    pub requests_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("SPECGATE_GIT_SHORT").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        services: ServicesHealth {
            total: state.store.list().len(),
            proxyable: state.store.proxyable_count(),
        },
        stats: StatsResponse {
            requests_forwarded: state.stats.forwarded.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
        },
    })
}
