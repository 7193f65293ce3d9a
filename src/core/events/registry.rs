//! Registry of live event channels
//!
//! Only used to hand out session ids and to tear every channel down
//! on shutdown. Events are never routed between channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::channel::{ChannelOptions, EventChannel, EventStream};

type ChannelMap = Mutex<HashMap<u64, EventChannel>>;

fn lock(channels: &ChannelMap) -> MutexGuard<'_, HashMap<u64, EventChannel>> {
    channels.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Live event channels, keyed by session id
#[derive(Clone)]
pub struct ChannelRegistry {
    channels: Arc<ChannelMap>,
    next_id: Arc<AtomicU64>,
    options: ChannelOptions,
}

impl ChannelRegistry {
    pub fn new(options: ChannelOptions) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            options,
        }
    }

    /// Create, register and open a new channel
    ///
    /// The channel removes itself from the registry when it closes.
    pub fn open(&self) -> EventStream {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (channel, stream) = EventChannel::new(id);

        let channels = Arc::downgrade(&self.channels);
        channel.on_close(move || {
            if let Some(channels) = channels.upgrade() {
                lock(&channels).remove(&id);
            }
        });

        lock(&self.channels).insert(id, channel.clone());
        channel.open(&self.options);
        stream
    }

    /// Close every live channel, returning how many were closed
    pub fn close_all(&self) -> usize {
        let live: Vec<EventChannel> = lock(&self.channels).drain().map(|(_, c)| c).collect();
        live.iter().filter(|channel| channel.close()).count()
    }

    pub fn get(&self, id: u64) -> Option<EventChannel> {
        lock(&self.channels).get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.channels).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.channels).is_empty()
    }

    pub fn options(&self) -> &ChannelOptions {
        &self.options
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new(ChannelOptions::default())
    }
}
