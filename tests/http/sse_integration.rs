//! Integration tests for the event stream endpoint

use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use futures::StreamExt;
use serde_json::Value;
use tower::ServiceExt as TowerServiceExt;

use crate::common::{create_test_app, get, TestTree};

/// Read the next SSE frame and parse its `data:` payload
async fn next_frame<S, E>(body: &mut S) -> Value
where
    S: futures::Stream<Item = Result<axum::body::Bytes, E>> + Unpin,
    E: std::fmt::Debug,
{
    let chunk = body.next().await.unwrap().unwrap();
    let text = std::str::from_utf8(&chunk).unwrap();
    assert!(text.starts_with("data: "), "unexpected frame: {text:?}");
    assert!(text.ends_with("\n\n"), "unterminated frame: {text:?}");
    serde_json::from_str(text.trim_start_matches("data: ").trim_end()).unwrap()
}

async fn open_stream(tree: &TestTree) -> (Response<Body>, sift::Services) {
    let (app, services) = create_test_app(&tree.root);
    let response = app.oneshot(get("/mcp/sse")).await.unwrap();
    (response, (*services).clone())
}

#[tokio::test(start_paused = true)]
async fn test_sse_headers() {
    let tree = TestTree::sample();
    let (response, _services) = open_stream(&tree).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::CONNECTION], "keep-alive");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test(start_paused = true)]
async fn test_sse_event_sequence() {
    let tree = TestTree::sample();
    let (response, _services) = open_stream(&tree).await;
    let mut body = Box::pin(response.into_body().into_data_stream());

    let connected = next_frame(&mut body).await;
    assert_eq!(connected["event"], "connected");
    assert_eq!(connected["message"], "SSE connection established");

    let update = next_frame(&mut body).await;
    assert_eq!(update["event"], "tool_update");
    assert_eq!(update["tool"], "file_searcher");
    assert_eq!(update["status"], "ready");

    let heartbeat = next_frame(&mut body).await;
    assert_eq!(heartbeat["event"], "heartbeat");
    assert!(heartbeat["timestamp"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_sse_disconnect_closes_channel() {
    let tree = TestTree::sample();
    let (response, services) = open_stream(&tree).await;
    assert_eq!(services.channels.len(), 1);

    let mut body = Box::pin(response.into_body().into_data_stream());
    let _ = next_frame(&mut body).await;

    // Client goes away
    drop(body);

    assert!(services.channels.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sse_shutdown_ends_stream() {
    let tree = TestTree::sample();
    let (response, services) = open_stream(&tree).await;
    let mut body = Box::pin(response.into_body().into_data_stream());
    let _ = next_frame(&mut body).await;

    services.shutdown();

    assert!(body.next().await.is_none());
}
