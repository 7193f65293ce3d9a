//! Core data types for the Sift tool server.
//!
//! This module defines the data structures shared by the walker,
//! the tool catalog and the HTTP adapter, including file entries,
//! search results, requests, and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::core::error::SearchError;
use crate::core::tools::ToolDescriptor;

/// Metadata for one file or directory found by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// File name (last path component)
    pub name: String,

    /// Absolute path, always inside the trusted root
    ///
    /// Serialized lossily: names that aren't valid UTF-8 carry U+FFFD
    /// in place of the bad bytes.
    #[serde(serialize_with = "serialize_lossy")]
    pub path: PathBuf,

    /// Whether the entry is a directory
    pub is_directory: bool,

    /// Size in bytes
    pub size: u64,

    /// Last modification time
    pub modified_time: DateTime<Utc>,
}

fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Outcome of a search, before it is put on the wire
///
/// `entries` may be non-empty even when `error` is set: a walk
/// stopped by a resource cap keeps what it collected.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub entries: Vec<FileEntry>,
    pub error: Option<SearchError>,
}

impl SearchResult {
    /// Failed search with no entries
    pub fn failed(error: SearchError) -> Self {
        Self {
            entries: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Query parameters for the file-search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Directory to search (untrusted until validated)
    pub directory: String,

    /// Descend into subdirectories (default: true)
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

fn default_recursive() -> bool {
    true
}

/// Response from the file-search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Entries found, in enumeration order
    pub files: Vec<FileEntry>,

    /// In-band failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            files: result.entries,
            error: result.error.map(|e| e.to_string()),
        }
    }
}

/// Response from the capability-discovery endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub status: String,
    pub message: String,
    pub tools: Vec<ToolDescriptor>,

    /// Response time (RFC 3339)
    pub timestamp: String,
}

/// Response from the tool-list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolDescriptor>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
