//! HTTP route handlers and client address extraction.
//!
//! Both endpoints accept any method and write an audit row per hit, so the
//! router marks their responses uncacheable. A request-ID middleware wraps
//! the router for log correlation.

pub mod health;
pub mod home;

use std::net::SocketAddr;

use axum::http::HeaderMap;
use axum::{middleware, routing::any, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_AUDITED;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Derive the originating client address from request metadata.
///
/// A forwarded-for header wins over the direct peer address: the leftmost
/// comma-separated entry names the original client ahead of any proxies.
/// Nothing validates that the result is a well-formed IP address, so a
/// spoofed or malformed header value is accepted as-is.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    peer.map(|addr| addr.ip().to_string())
}

/// Creates the Axum router with both audited endpoints.
pub fn create_router(state: AppState) -> Router {
    let audited_routes = Router::new()
        .route("/", any(home::home))
        .route("/health/", any(health::health_check))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_AUDITED),
        ));

    Router::new()
        .merge(audited_routes)
        .with_state(state)
        // Request ID middleware - creates root span for correlation
        .layer(middleware::from_fn(request_id_layer))
}
