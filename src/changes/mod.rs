//! Change notifications.
//!
//! The store publishes one [`ChangeEvent`] for every committed mutation,
//! from inside the write that committed it.
//! It only depends on the [`Broadcaster`] trait; [`ChangeHub`] is the
//! in-process implementation with per-subscriber bounded queues. Other
//! transports (websocket push, message bus) implement the trait on their side.

/// Event type definitions.
pub mod event;
/// Channel-backed broadcaster.
pub mod hub;
/// Subscriber stream handle.
pub mod stream;

pub use event::{ChangeEntity, ChangeEvent, ChangeKind};
pub use hub::{ChangeHub, ChangeHubConfig, SubscriptionId};
pub use stream::ChangeStream;

/// Sink for change events.
///
/// Implementations must not block and must not call back into the store:
/// `broadcast` runs while the store's write lock is held.
pub trait Broadcaster: Send + Sync {
    /// Publish one event.
    fn broadcast(&self, event: ChangeEvent);
}

/// Broadcaster that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBroadcaster;

impl Broadcaster for NoopBroadcaster {
    fn broadcast(&self, _event: ChangeEvent) {}
}
