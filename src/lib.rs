//! Sift - sandboxed file-search tool server
//!
//! Exposes a small, static set of tools over HTTP: capability
//! discovery, a file search confined to one trusted directory, and a
//! Server-Sent Events channel announcing tool readiness and liveness.
//!
//! # Architecture
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg, tools
//!   - walker (trusted root, bounded directory walk)
//!   - events (per-connection channels, registry)
//!   - services (unified service container)
//!
//! - **http**: REST + SSE adapter (depends on core)
//!   - handlers, middleware, router

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP adapter
pub mod http;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{Result, SearchError, SiftError};
pub use crate::core::events::{ChannelRegistry, Event, EventChannel};
pub use crate::core::services::Services;
pub use crate::core::types::*;
pub use crate::core::walker::{PathSandboxedWalker, TrustedRoot, WalkOptions};
