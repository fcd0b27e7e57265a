//! Channel-backed change broadcaster.
//!
//! Every subscriber owns a bounded queue. Publishing uses `try_send` into each
//! queue and never waits: a subscriber whose queue is full misses the event,
//! and the miss is counted. Store writers therefore never stall on a slow
//! consumer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crossbeam_channel::{bounded, Sender, TrySendError};

use super::event::ChangeEvent;
use super::stream::ChangeStream;
use super::Broadcaster;

/// Identifier of one subscription on a [`ChangeHub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub struct ChangeHubConfig {
    /// Per-subscriber queue capacity.
    pub stream_capacity: usize,
}

impl Default for ChangeHubConfig {
    fn default() -> Self {
        Self {
            stream_capacity: 1024,
        }
    }
}

#[derive(Debug)]
struct Subscriber {
    id: SubscriptionId,
    tx: Sender<ChangeEvent>,
}

/// Fan-out broadcaster handing each event to every live subscriber.
#[derive(Debug)]
pub struct ChangeHub {
    cfg: ChangeHubConfig,
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
    published: AtomicU64,
    dropped_events: AtomicU64,
}

impl ChangeHub {
    /// Create a hub with no subscribers.
    #[must_use]
    pub fn new(cfg: ChangeHubConfig) -> Self {
        Self {
            cfg,
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            published: AtomicU64::new(0),
            dropped_events: AtomicU64::new(0),
        }
    }

    /// Open a new stream. Only events published after this call are delivered.
    pub fn subscribe(&self) -> ChangeStream {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = bounded(self.cfg.stream_capacity.max(1));
        match self.subscribers.lock() {
            Ok(mut subs) => subs.push(Subscriber { id, tx }),
            Err(poisoned) => poisoned.into_inner().push(Subscriber { id, tx }),
        }
        ChangeStream::new(id, rx)
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(subs) => subs.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Events handed to `broadcast` so far.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Deliveries skipped because a subscriber queue was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(ChangeHubConfig::default())
    }
}

impl Broadcaster for ChangeHub {
    fn broadcast(&self, event: ChangeEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);

        // Only try_send happens under this lock.
        let mut subs = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        subs.retain(|sub| match sub.tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped_events.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    subscription = sub.id.0,
                    event = event.name(),
                    "change subscriber queue full, dropping event"
                );
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!(subscription = sub.id.0, "change subscriber gone");
                false
            }
        });
    }
}
