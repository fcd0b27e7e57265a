use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::error::StreamError;

use super::event::ChangeEvent;
use super::hub::SubscriptionId;

/// A subscriber's view of the change feed.
///
/// Dropping the stream disconnects it; the hub forgets disconnected
/// subscribers on its next publish.
#[derive(Debug)]
pub struct ChangeStream {
    subscription_id: SubscriptionId,
    rx: Receiver<ChangeEvent>,
}

impl ChangeStream {
    pub(crate) fn new(subscription_id: SubscriptionId, rx: Receiver<ChangeEvent>) -> Self {
        Self { subscription_id, rx }
    }

    /// The subscription id backing this stream.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<ChangeEvent, StreamError> {
        self.rx.recv().map_err(|_| StreamError::Disconnected)
    }

    /// Receive the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<ChangeEvent, StreamError> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => StreamError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
            RecvTimeoutError::Disconnected => StreamError::Disconnected,
        })
    }

    /// Take a pending event without waiting.
    pub fn try_recv(&self) -> Result<ChangeEvent, StreamError> {
        self.rx.try_recv().map_err(|err| match err {
            TryRecvError::Empty => StreamError::Empty,
            TryRecvError::Disconnected => StreamError::Disconnected,
        })
    }

    /// Drain every event queued right now.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.rx.try_iter().collect()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True if no event is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
