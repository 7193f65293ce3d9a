//! Integration tests for the Sift REST endpoints

use axum::http::StatusCode;
use serde_json::Value;
use sift::core::types::*;
use tower::ServiceExt as TowerServiceExt;

use crate::common::{body_json, create_test_app, encode_query, get, sorted_names, TestTree};

fn search_uri(directory: &str, recursive: Option<bool>) -> String {
    let mut uri = format!(
        "/tool/file-search/search?directory={}",
        encode_query(directory)
    );
    if let Some(recursive) = recursive {
        uri.push_str(&format!("&recursive={recursive}"));
    }
    uri
}

#[tokio::test]
async fn test_health_endpoint() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = body_json(response).await;
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_initialize_endpoint() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app.oneshot(get("/mcp/initialize")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "MCP initialized successfully");
    assert_eq!(body["tools"][0]["name"], "file_searcher");
    assert_eq!(
        body["tools"][0]["parameters"]["directory"]["required"],
        true
    );
    assert_eq!(
        body["tools"][0]["parameters"]["recursive"]["type"],
        "boolean"
    );
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_tools_endpoint_shares_catalog() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app.clone().oneshot(get("/mcp/tools")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed: ToolsResponse = body_json(response).await;

    let response = app.oneshot(get("/mcp/initialize")).await.unwrap();
    let initialized: InitializeResponse = body_json(response).await;

    assert_eq!(listed.count, 1);
    assert_eq!(listed.tools, initialized.tools);
}

#[tokio::test]
async fn test_search_recursive_by_default() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app
        .oneshot(get(&search_uri(&tree.path("data"), None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: SearchResponse = body_json(response).await;
    assert!(body.error.is_none());
    assert_eq!(sorted_names(&body.files), vec!["a.txt", "b.txt", "sub"]);
}

#[tokio::test]
async fn test_search_non_recursive() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app
        .oneshot(get(&search_uri(&tree.path("data"), Some(false))))
        .await
        .unwrap();

    let body: SearchResponse = body_json(response).await;
    assert_eq!(sorted_names(&body.files), vec!["a.txt", "sub"]);
}

#[tokio::test]
async fn test_search_wire_fields() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app
        .oneshot(get(&search_uri(&tree.path("data"), Some(false))))
        .await
        .unwrap();

    let body: Value = body_json(response).await;
    assert!(body.get("error").is_none());
    let sub = body["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "sub")
        .unwrap();
    assert_eq!(sub["isDirectory"], true);
    assert!(sub["size"].is_u64());
    assert!(sub["modifiedTime"].is_string());
    assert!(sub["path"].as_str().unwrap().ends_with("sub"));
}

#[tokio::test]
async fn test_search_errors_are_in_band() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let escaping = format!("{}/../etc", tree.root.display());
    let cases = [
        (
            escaping,
            "Access denied: Can only search directories within the project",
        ),
        (tree.path("missing"), "Directory not found"),
        (tree.path("README.md"), "Provided path is not a directory"),
    ];

    for (directory, expected) in cases {
        let response = app
            .clone()
            .oneshot(get(&search_uri(&directory, None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: SearchResponse = body_json(response).await;
        assert!(body.files.is_empty());
        assert_eq!(body.error.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_search_denied_response_does_not_leak_path() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let outside = tree.outside().to_str().unwrap().to_string();
    let response = app
        .oneshot(get(&search_uri(&outside, None)))
        .await
        .unwrap();

    let body: SearchResponse = body_json(response).await;
    let error = body.error.unwrap();
    assert!(!error.contains(&outside));
}

#[tokio::test]
async fn test_search_missing_directory_parameter() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app
        .oneshot(get("/tool/file-search/search"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let tree = TestTree::sample();
    let (app, _services) = create_test_app(&tree.root);

    let response = app.oneshot(get("/mcp/plugins")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_search_non_utf8_file_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tree = TestTree::sample();
    std::fs::write(
        tree.root.join("data").join(OsStr::from_bytes(b"bad\xffname.txt")),
        "x",
    )
    .unwrap();
    let (app, _services) = create_test_app(&tree.root);

    let response = app
        .oneshot(get(&search_uri(&tree.path("data"), None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = body_json(response).await;
    assert!(body.get("error").is_none());
    let bad = body["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "bad\u{FFFD}name.txt")
        .unwrap();
    assert!(bad["path"]
        .as_str()
        .unwrap()
        .ends_with("data/bad\u{FFFD}name.txt"));
    assert_eq!(bad["isDirectory"], false);
}
