//! Server-push event channels.
//!
//! - **event**: event kinds and their JSON shape
//! - **channel**: one session per connection (queue, timers, teardown)
//! - **registry**: live sessions, for shutdown
//!
//! # Lifecycle
//!
//! ```text
//! Init --open()--> Open --close() / stream dropped--> Closed
//! ```
//!
//! `connected` is queued on open, `heartbeat` every interval while
//! open, `tool_update` once after the configured delay. Close is
//! idempotent and cancels every timer.

pub mod channel;
pub mod event;
pub mod registry;

pub use channel::{ChannelOptions, EventChannel, EventSender, EventStream};
pub use event::Event;
pub use registry::ChannelRegistry;
