//! Host entity.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::id::ObjectId;
use crate::plugin::Transport;

/// A machine the scheduler can reach through a transport.
///
/// Cloning a host is cheap: the transport is shared behind an `Arc` and only
/// exposes `&self` methods once configured, so clones cannot affect each other.
#[derive(Clone)]
pub struct Host {
    /// Identifier, unique among hosts.
    pub id: ObjectId,

    /// Host name from the configuration section key.
    pub name: String,

    /// Plugin id that selected [`Host::transport`].
    pub transport_id: String,

    /// Configured transport instance.
    pub transport: Arc<dyn Transport>,
}

impl Host {
    /// Creates a host with a fresh id.
    ///
    /// Stores assign their own id on insert; the one set here is a placeholder.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        transport_id: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            transport_id: transport_id.into(),
            transport,
        }
    }

    /// Returns true if this is the well-known `localhost` entry.
    #[must_use]
    pub fn is_localhost(&self) -> bool {
        self.id == ObjectId::LOCALHOST
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("id", &self.id.to_hex())
            .field("name", &self.name)
            .field("transport_id", &self.transport_id)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Common fields of a host record, decoded before the transport is chosen.
#[derive(Debug, Deserialize)]
pub(crate) struct HostRecord {
    pub transport: String,
}
