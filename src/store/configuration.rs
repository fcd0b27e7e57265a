//! In-memory store materialized from the configuration file.
//!
//! The store is populated once by the loader and then mutated only in memory.
//! Nothing is ever written back to the configuration file: hosts and monitors
//! added at runtime disappear on restart, and deleted ones come back.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::changes::{Broadcaster, ChangeEvent};
use crate::config::Configuration;
use crate::error::{LoadError, StoreError, TopologyResult};
use crate::host::Host;
use crate::id::ObjectId;
use crate::monitor::Monitor;
use crate::plugin::PluginRegistry;
use crate::subject::Subject;

use super::loader::load_state;
use super::traits::TopologyStore;

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend {
        message: format!("poisoned lock: {context}"),
    }
}

#[derive(Debug, Default)]
pub(crate) struct TopologyState {
    pub hosts: HashMap<ObjectId, Host>,
    pub monitors: HashMap<ObjectId, Monitor>,
}

impl TopologyState {
    pub fn host_by_name(&self, name: &str) -> Option<&Host> {
        self.hosts.values().find(|h| h.name == name)
    }
}

/// Host and monitor store backed by the configuration file.
///
/// All mutations run under one store-wide write lock; reads take the read
/// lock and clone out. Change events are published while the write lock is
/// held, so subscribers observe them in commit order. The broadcaster must not
/// call back into the store.
pub struct ConfigurationStore {
    changes: Arc<dyn Broadcaster>,
    state: RwLock<TopologyState>,
}

impl ConfigurationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(changes: Arc<dyn Broadcaster>) -> Self {
        Self {
            changes,
            state: RwLock::new(TopologyState::default()),
        }
    }

    /// Load every host and monitor from `config`.
    ///
    /// Hosts are resolved first; monitors then reference hosts by name.
    ///
    /// # Errors
    /// - `UnknownTransport` / `UnknownAgent`: a selector has no registered plugin
    /// - `HostNotFound`: a monitor names a host missing from the `hosts` section
    /// - `Decode` / `PluginDecode`: a record does not match the expected schema
    ///
    /// Loading is all or nothing; on error no store is returned.
    pub fn load(
        config: &Configuration,
        plugins: &PluginRegistry,
        changes: Arc<dyn Broadcaster>,
    ) -> Result<Self, LoadError> {
        let state = load_state(config, plugins)?;
        Ok(Self {
            changes,
            state: RwLock::new(state),
        })
    }

    /// Read the configuration file at `path` and load it.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::Config` if the file cannot be read or parsed,
    /// and `TopologyError::Load` for the failures of [`ConfigurationStore::load`].
    pub fn from_path(
        path: impl AsRef<Path>,
        plugins: &PluginRegistry,
        changes: Arc<dyn Broadcaster>,
    ) -> TopologyResult<Self> {
        let config = Configuration::from_path(path)?;
        Ok(Self::load(&config, plugins, changes)?)
    }

    /// Number of hosts.
    pub fn host_count(&self) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("hosts.count"))?;
        Ok(state.hosts.len())
    }

    /// Number of monitors.
    pub fn monitor_count(&self) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("monitors.count"))?;
        Ok(state.monitors.len())
    }
}

impl std::fmt::Debug for ConfigurationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TopologyStore for ConfigurationStore {
    fn list_hosts(&self, _subject: &dyn Subject) -> Result<Vec<Host>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("hosts.list"))?;
        Ok(state.hosts.values().cloned().collect())
    }

    fn get_host(&self, _subject: &dyn Subject, id: &str) -> Result<Host, StoreError> {
        let oid = ObjectId::parse_hex(id).map_err(|_| StoreError::invalid_id(id))?;
        let state = self.state.read().map_err(|_| lock_err("hosts.get"))?;
        state
            .hosts
            .get(&oid)
            .cloned()
            .ok_or_else(|| StoreError::invalid_id(id))
    }

    fn get_host_by_name(&self, _subject: &dyn Subject, name: &str) -> Result<Host, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("hosts.get_by_name"))?;
        state
            .host_by_name(name)
            .cloned()
            .ok_or_else(|| StoreError::host_not_found(name))
    }

    fn add_host(&self, _subject: &dyn Subject, mut host: Host) -> Result<Host, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("hosts.add"))?;
        let mut id = ObjectId::new();
        while state.hosts.contains_key(&id) {
            id = ObjectId::new();
        }
        host.id = id;
        state.hosts.insert(id, host.clone());
        self.changes.broadcast(ChangeEvent::host_added(host.clone()));
        drop(state);

        debug!(id = %host.id, host = %host.name, "host added");
        Ok(host)
    }

    fn delete_host(&self, _subject: &dyn Subject, id: &str) -> Result<Host, StoreError> {
        let oid = ObjectId::parse_hex(id).map_err(|_| StoreError::host_not_found(id))?;
        let mut state = self.state.write().map_err(|_| lock_err("hosts.delete"))?;
        let host = state
            .hosts
            .remove(&oid)
            .ok_or_else(|| StoreError::host_not_found(id))?;
        self.changes.broadcast(ChangeEvent::host_deleted(host.clone()));
        drop(state);

        debug!(id = %host.id, host = %host.name, "host deleted");
        Ok(host)
    }

    fn list_monitors(&self, _subject: &dyn Subject) -> Result<Vec<Monitor>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("monitors.list"))?;
        Ok(state.monitors.values().cloned().collect())
    }

    fn get_monitor(&self, _subject: &dyn Subject, id: &str) -> Result<Monitor, StoreError> {
        let oid = ObjectId::parse_hex(id).map_err(|_| StoreError::monitor_not_found(id))?;
        let state = self.state.read().map_err(|_| lock_err("monitors.get"))?;
        state
            .monitors
            .get(&oid)
            .cloned()
            .ok_or_else(|| StoreError::monitor_not_found(id))
    }

    fn add_monitor(
        &self,
        _subject: &dyn Subject,
        mut monitor: Monitor,
    ) -> Result<Monitor, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("monitors.add"))?;
        let mut id = ObjectId::new();
        while state.monitors.contains_key(&id) {
            id = ObjectId::new();
        }
        monitor.id = id;
        state.monitors.insert(id, monitor.clone());
        self.changes.broadcast(ChangeEvent::monitor_added(monitor.clone()));
        drop(state);

        debug!(id = %monitor.id, host_id = %monitor.host_id, "monitor added");
        Ok(monitor)
    }

    fn update_monitor(
        &self,
        _subject: &dyn Subject,
        monitor: Monitor,
    ) -> Result<Monitor, StoreError> {
        if monitor.id.is_nil() {
            return Err(StoreError::invalid_id(monitor.id.to_hex()));
        }

        let mut state = self.state.write().map_err(|_| lock_err("monitors.update"))?;
        let replaced = state.monitors.insert(monitor.id, monitor.clone()).is_some();
        self.changes.broadcast(ChangeEvent::monitor_changed(monitor.clone()));
        drop(state);

        debug!(id = %monitor.id, replaced, "monitor updated");
        Ok(monitor)
    }

    fn delete_monitor(&self, _subject: &dyn Subject, id: &str) -> Result<Monitor, StoreError> {
        let oid = ObjectId::parse_hex(id).map_err(|_| StoreError::monitor_not_found(id))?;
        let mut state = self.state.write().map_err(|_| lock_err("monitors.delete"))?;
        let monitor = state
            .monitors
            .remove(&oid)
            .ok_or_else(|| StoreError::monitor_not_found(id))?;
        self.changes.broadcast(ChangeEvent::monitor_deleted(monitor.clone()));
        drop(state);

        debug!(id = %monitor.id, "monitor deleted");
        Ok(monitor)
    }
}
