//! Unified service container for Sift
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::events::{ChannelOptions, ChannelRegistry};
use crate::core::walker::PathSandboxedWalker;
use std::sync::Arc;

/// Unified services container
///
/// The HTTP adapter shares one instance across all handlers.
#[derive(Clone)]
pub struct Services {
    /// Sandboxed file search over the configured base directory
    pub walker: Arc<PathSandboxedWalker>,

    /// Live event channels
    pub channels: ChannelRegistry,
}

impl Services {
    /// Create services from configuration
    ///
    /// # Errors
    ///
    /// - `InvalidPath`: the base directory is missing or not a directory
    pub fn new(config: &Config) -> Result<Self> {
        let walker = Arc::new(PathSandboxedWalker::from_config(config)?);
        let channels = ChannelRegistry::new(ChannelOptions::from(&config.events));

        Ok(Self { walker, channels })
    }

    /// Tear down everything holding connections open
    pub fn shutdown(&self) {
        let closed = self.channels.close_all();
        tracing::info!("Closed {} event channel(s)", closed);
    }
}
