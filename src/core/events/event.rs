//! Events pushed to stream consumers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message sent on an event channel
///
/// Serialized as one JSON object tagged by its `event` field, e.g.
/// `{"event":"heartbeat","timestamp":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// First message on every channel
    Connected { message: String },

    /// Periodic liveness signal
    Heartbeat { timestamp: DateTime<Utc> },

    /// A tool changed readiness
    ToolUpdate { tool: String, status: String },
}

impl Event {
    pub fn connected() -> Self {
        Event::Connected {
            message: "SSE connection established".to_string(),
        }
    }

    pub fn heartbeat() -> Self {
        Event::Heartbeat {
            timestamp: Utc::now(),
        }
    }

    pub fn tool_ready(tool: &str) -> Self {
        Event::ToolUpdate {
            tool: tool.to_string(),
            status: "ready".to_string(),
        }
    }

    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Connected { .. } => "connected",
            Event::Heartbeat { .. } => "heartbeat",
            Event::ToolUpdate { .. } => "tool_update",
        }
    }
}
