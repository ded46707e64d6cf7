//! Tower middleware layers shared by every route.
//!
//! Request tracing and body limits are configured in
//! [`server::build_router`](crate::server::build_router); this module holds
//! the CORS policy that lets browser clients call the API from any origin.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// How long browsers may cache a preflight answer.
pub const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(CORS_MAX_AGE)
}
