//! Per-connection event channel.
//!
//! A channel owns one outbound queue, the timer tasks feeding it and
//! a liveness phase. Producers never touch the transport: they push
//! into the queue through [`EventSender`], and the single consumer
//! drains it as an [`EventStream`]. Every push checks the phase under
//! the same lock that `close` takes, so a timer that fires while the
//! channel is closing can never enqueue after the close.

use futures::Stream;
use std::mem;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::core::config::EventsConfig;
use crate::core::tools::FILE_SEARCHER;

use super::event::Event;

/// Timing for the built-in event sources of a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOptions {
    pub heartbeat_interval: Duration,

    /// Delay before the tool readiness event; `None` disables it
    pub tool_update_delay: Option<Duration>,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self::from(&EventsConfig::default())
    }
}

impl From<&EventsConfig> for ChannelOptions {
    fn from(config: &EventsConfig) -> Self {
        Self {
            heartbeat_interval: config.heartbeat_interval(),
            tool_update_delay: Some(config.tool_update_delay()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Open,
    Closed,
}

type CloseHook = Box<dyn FnOnce() + Send>;

struct ChannelState {
    phase: Phase,
    tx: Option<mpsc::UnboundedSender<Event>>,
    timers: Vec<JoinHandle<()>>,
    on_close: Option<CloseHook>,
}

fn lock(state: &Mutex<ChannelState>) -> MutexGuard<'_, ChannelState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Producer handle for a channel's queue
#[derive(Clone)]
pub struct EventSender {
    state: Arc<Mutex<ChannelState>>,
}

impl EventSender {
    /// Enqueue an event if the channel is open
    ///
    /// Returns `false` when the channel is not open; the event is
    /// dropped.
    pub fn push(&self, event: Event) -> bool {
        let state = lock(&self.state);
        if state.phase != Phase::Open {
            return false;
        }
        match &state.tx {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).phase == Phase::Open
    }
}

/// Event channel session for one connection
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct EventChannel {
    id: u64,
    state: Arc<Mutex<ChannelState>>,
}

impl EventChannel {
    /// Create a channel in the `Init` phase and its drain stream
    pub fn new(id: u64) -> (Self, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = Self {
            id,
            state: Arc::new(Mutex::new(ChannelState {
                phase: Phase::Init,
                tx: Some(tx),
                timers: Vec::new(),
                on_close: None,
            })),
        };
        let stream = EventStream {
            rx,
            channel: channel.clone(),
        };
        (channel, stream)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Start the channel: emit `connected`, start the heartbeat and
    /// schedule the tool readiness event
    ///
    /// Must be called inside a Tokio runtime. Returns `false` if the
    /// channel was already opened or closed.
    pub fn open(&self, options: &ChannelOptions) -> bool {
        {
            let mut state = lock(&self.state);
            if state.phase != Phase::Init {
                return false;
            }
            state.phase = Phase::Open;
        }

        self.sender().push(Event::connected());
        tracing::info!(session = self.id, "Event channel opened");

        let sender = self.sender();
        let period = options.heartbeat_interval;
        let session = self.id;
        let heartbeat = tokio::spawn(async move {
            // First tick one full period after open
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !sender.push(Event::heartbeat()) {
                    break;
                }
                tracing::debug!(session = session, "Heartbeat sent");
            }
        });
        self.track(heartbeat);

        if let Some(delay) = options.tool_update_delay {
            self.schedule(delay, Event::tool_ready(FILE_SEARCHER));
        }

        true
    }

    /// Handle for pushing events from any trigger
    pub fn sender(&self) -> EventSender {
        EventSender {
            state: Arc::clone(&self.state),
        }
    }

    /// Push `event` after `delay`, unless the channel closes first
    pub fn schedule(&self, delay: Duration, event: Event) {
        let sender = self.sender();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            sender.push(event);
        });
        self.track(handle);
    }

    /// Register a callback run once when the channel closes
    ///
    /// Runs immediately if the channel is already closed.
    pub fn on_close(&self, hook: impl FnOnce() + Send + 'static) {
        let mut state = lock(&self.state);
        if state.phase == Phase::Closed {
            drop(state);
            hook();
            return;
        }
        state.on_close = Some(Box::new(hook));
    }

    /// Tear the channel down
    ///
    /// Cancels every timer, ends the stream and runs the close hook.
    /// Returns `false` if the channel was already closed.
    pub fn close(&self) -> bool {
        let (timers, hook) = {
            let mut state = lock(&self.state);
            if state.phase == Phase::Closed {
                return false;
            }
            state.phase = Phase::Closed;
            // Dropping the sender is the end-of-stream marker
            state.tx = None;
            (mem::take(&mut state.timers), state.on_close.take())
        };

        for timer in &timers {
            timer.abort();
        }
        if let Some(hook) = hook {
            hook();
        }

        tracing::info!(
            session = self.id,
            timers = timers.len(),
            "Event channel closed"
        );
        true
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).phase == Phase::Open
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).phase == Phase::Closed
    }

    /// Number of timer tasks still running
    pub fn pending_timers(&self) -> usize {
        lock(&self.state)
            .timers
            .iter()
            .filter(|timer| !timer.is_finished())
            .count()
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut state = lock(&self.state);
        if state.phase == Phase::Closed {
            handle.abort();
            return;
        }
        state.timers.retain(|timer| !timer.is_finished());
        state.timers.push(handle);
    }
}

/// Drain side of a channel
///
/// Yields queued events until the channel closes. Dropping the
/// stream (the transport noticed the consumer left) closes the
/// channel.
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
    channel: EventChannel,
}

impl EventStream {
    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        if self.channel.is_closed() {
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.channel.close();
    }
}
