//! Core domain logic (protocol-agnostic)
//!
//! This module contains all logic that is independent of the HTTP
//! transport.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG config file location
//! - **tools**: Static tool catalog
//! - **walker**: Sandboxed directory search
//! - **events**: Server-push event channels
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod tools;
pub mod types;
pub mod walker;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, SearchError, SiftError};
pub use services::Services;
