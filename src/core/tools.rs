//! Static tool catalog
//!
//! The tools this server offers are configuration, not a plugin
//! registry. Both the discovery and the tool-list endpoints read the
//! same table so their descriptors cannot drift apart.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the file search tool
pub const FILE_SEARCHER: &str = "file_searcher";

/// Description of a single tool parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// JSON type name ("string", "boolean", ...)
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSpec {
    fn new(kind: &str, required: bool, description: &str) -> Self {
        Self {
            kind: kind.to_string(),
            required: Some(required),
            description: Some(description.to_string()),
        }
    }
}

/// Tool descriptor as published to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParameterSpec>,
}

static CATALOG: Lazy<BTreeMap<&'static str, ToolDescriptor>> = Lazy::new(|| {
    let mut parameters = BTreeMap::new();
    parameters.insert(
        "directory".to_string(),
        ParameterSpec::new(
            "string",
            true,
            "The directory path to search (absolute path within project)",
        ),
    );
    parameters.insert(
        "recursive".to_string(),
        ParameterSpec::new(
            "boolean",
            false,
            "Whether to search recursively (default: true)",
        ),
    );

    let mut catalog = BTreeMap::new();
    catalog.insert(
        FILE_SEARCHER,
        ToolDescriptor {
            name: FILE_SEARCHER.to_string(),
            description: "Search files in the specified directory with optional recursive search"
                .to_string(),
            parameters,
        },
    );
    catalog
});

/// All tool descriptors, ordered by name
pub fn list() -> Vec<ToolDescriptor> {
    CATALOG.values().cloned().collect()
}

/// Look up a tool descriptor by name
pub fn get(name: &str) -> Option<&'static ToolDescriptor> {
    CATALOG.get(name)
}

/// Number of tools offered
pub fn count() -> usize {
    CATALOG.len()
}
