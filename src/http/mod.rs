//! HTTP adapter
//!
//! Depends only on core/.
//!
//! Provides the tool discovery, file search and event stream
//! endpoints via the Axum web framework.

pub mod handlers;
pub mod middleware;

pub use handlers::*;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::core::services::Services;

/// Build the application router
///
/// | Route | Handler |
/// |---|---|
/// | `GET /health` | [`health_handler`] |
/// | `GET /mcp/initialize` | [`initialize_handler`] |
/// | `GET /mcp/tools` | [`tools_handler`] |
/// | `GET /mcp/sse` | [`sse_handler`] |
/// | `GET /tool/file-search/search` | [`search_handler`] |
pub fn router(services: Arc<Services>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/mcp/initialize", get(initialize_handler))
        .route("/mcp/tools", get(tools_handler))
        .route("/mcp/sse", get(sse_handler))
        .route("/tool/file-search/search", get(search_handler))
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        .with_state(services)
}
