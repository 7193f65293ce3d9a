// Test helper functions

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde::de::DeserializeOwned;
use sift::core::config::Config;
use sift::core::services::Services;
use sift::core::types::FileEntry;
use sift::http;
use std::path::Path;
use std::sync::Arc;

/// Create services sandboxed to `root`
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(root: &Path) -> Arc<Services> {
    let mut config = Config::default();
    config.sandbox.base_dir = root.to_path_buf();
    Arc::new(Services::new(&config).expect("Failed to create services"))
}

/// Create the full router sandboxed to `root`
#[allow(dead_code)] // Used in integration tests
pub fn create_test_app(root: &Path) -> (Router, Arc<Services>) {
    let services = create_test_services(root);
    (http::router(Arc::clone(&services)), services)
}

/// Build a GET request
#[allow(dead_code)] // Used in integration tests
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Read a JSON response body
#[allow(dead_code)] // Used in integration tests
pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Entry names, sorted for order-insensitive comparison
#[allow(dead_code)] // Used in integration tests
pub fn sorted_names(entries: &[FileEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
    names.sort();
    names
}

/// Percent-encode a path for use in a query string
#[allow(dead_code)] // Used in integration tests
pub fn encode_query(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
