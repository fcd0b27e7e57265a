//! Change event types.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::host::Host;
use crate::id::ObjectId;
use crate::monitor::Monitor;

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A host was added.
    HostAdd,
    /// A host was deleted.
    HostDelete,
    /// A monitor was added.
    MonitorAdd,
    /// A monitor was replaced or upserted.
    MonitorChange,
    /// A monitor was deleted.
    MonitorDelete,
}

impl ChangeKind {
    /// Wire name of the event, as subscribers (and the web client) know it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HostAdd => "hostadd",
            Self::HostDelete => "hostdelete",
            Self::MonitorAdd => "monadd",
            Self::MonitorChange => "monchange",
            Self::MonitorDelete => "mondelete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The entity a change event carries.
#[derive(Debug, Clone)]
pub enum ChangeEntity {
    /// Host payload.
    Host(Host),
    /// Monitor payload.
    Monitor(Monitor),
}

impl ChangeEntity {
    /// Id of the carried entity.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Host(h) => h.id,
            Self::Monitor(m) => m.id,
        }
    }
}

/// A committed mutation of the store.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// What happened.
    pub kind: ChangeKind,
    /// Copy of the entity as stored (or as removed).
    pub entity: ChangeEntity,
    /// When the mutation was committed (UTC).
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    fn new(kind: ChangeKind, entity: ChangeEntity) -> Self {
        Self {
            kind,
            entity,
            at: Utc::now(),
        }
    }

    /// `hostadd` event.
    #[must_use]
    pub fn host_added(host: Host) -> Self {
        Self::new(ChangeKind::HostAdd, ChangeEntity::Host(host))
    }

    /// `hostdelete` event.
    #[must_use]
    pub fn host_deleted(host: Host) -> Self {
        Self::new(ChangeKind::HostDelete, ChangeEntity::Host(host))
    }

    /// `monadd` event.
    #[must_use]
    pub fn monitor_added(monitor: Monitor) -> Self {
        Self::new(ChangeKind::MonitorAdd, ChangeEntity::Monitor(monitor))
    }

    /// `monchange` event.
    #[must_use]
    pub fn monitor_changed(monitor: Monitor) -> Self {
        Self::new(ChangeKind::MonitorChange, ChangeEntity::Monitor(monitor))
    }

    /// `mondelete` event.
    #[must_use]
    pub fn monitor_deleted(monitor: Monitor) -> Self {
        Self::new(ChangeKind::MonitorDelete, ChangeEntity::Monitor(monitor))
    }

    /// Wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The carried host, if this is a host event.
    #[must_use]
    pub fn host(&self) -> Option<&Host> {
        match &self.entity {
            ChangeEntity::Host(h) => Some(h),
            ChangeEntity::Monitor(_) => None,
        }
    }

    /// The carried monitor, if this is a monitor event.
    #[must_use]
    pub fn monitor(&self) -> Option<&Monitor> {
        match &self.entity {
            ChangeEntity::Monitor(m) => Some(m),
            ChangeEntity::Host(_) => None,
        }
    }
}
