//! HTTP request handlers for the Sift API
//!
//! Implements the discovery, tool list, file search and event
//! stream endpoints, plus a health probe.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{
        sse::{Event as SseEvent, Sse},
        IntoResponse,
    },
    Json,
};
use chrono::Utc;
use futures::{Stream, StreamExt};

use crate::core::error::SearchError;
use crate::core::events::{Event, EventStream};
use crate::core::services::Services;
use crate::core::tools;
use crate::core::types::*;

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Capability discovery handler
///
/// Returns the tool catalog wrapped with a status, a message and the
/// current time.
pub async fn initialize_handler() -> Json<InitializeResponse> {
    Json(InitializeResponse {
        status: "success".to_string(),
        message: "MCP initialized successfully".to_string(),
        tools: tools::list(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Tool list handler
pub async fn tools_handler() -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: tools::list(),
        count: tools::count(),
    })
}

/// File search handler
///
/// Runs a sandboxed directory search on the blocking pool.
///
/// # Arguments
///
/// * `services` - Shared application state
/// * `req` - Query parameters `directory` and `recursive`
///
/// # Returns
///
/// Always 200. Failures (access denied, not found, wrong type,
/// permission denied, resource limit) are reported in `error`.
pub async fn search_handler(
    State(services): State<Arc<Services>>,
    Query(req): Query<SearchRequest>,
) -> Json<SearchResponse> {
    let walker = Arc::clone(&services.walker);
    let directory = req.directory;
    let recursive = req.recursive;

    let result = tokio::task::spawn_blocking(move || walker.search(&directory, recursive))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Search task failed: {}", e);
            SearchResult::failed(SearchError::Unclassified(e.to_string()))
        });

    if let Some(error) = &result.error {
        tracing::info!(error = %error, entries = result.entries.len(), "Search returned error");
    }

    Json(SearchResponse::from(result))
}

/// Event stream handler
///
/// Opens a new event channel and streams it as `text/event-stream`.
/// The channel closes when the client disconnects and the response
/// body is dropped.
pub async fn sse_handler(State(services): State<Arc<Services>>) -> impl IntoResponse {
    let stream = services.channels.open();
    tracing::info!(session = stream.channel().id(), "Client subscribed to events");

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Sse::new(sse_frames(stream)),
    )
}

/// Frame channel events as `data: <json>` messages
fn sse_frames(stream: EventStream) -> impl Stream<Item = Result<SseEvent, Infallible>> {
    stream.filter_map(|event: Event| async move {
        match SseEvent::default().json_data(&event) {
            Ok(frame) => Some(Ok(frame)),
            Err(e) => {
                tracing::warn!("Dropping unserializable {} event: {}", event.kind(), e);
                None
            }
        }
    })
}
