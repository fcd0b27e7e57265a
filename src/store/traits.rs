//! Store contract shared by topology backends.

use crate::error::StoreError;
use crate::host::Host;
use crate::id::ObjectId;
use crate::monitor::Monitor;
use crate::subject::Subject;

/// Host and monitor operations used by API handlers and the scheduler.
///
/// # Contract
/// - Reads return owned copies; mutating them never affects the store.
/// - Every successful mutation publishes exactly one change event before the
///   next mutation can commit, so subscribers see events in commit order.
///   Reads and failed calls publish nothing.
/// - Identifiers are passed as hex strings, as they arrive from clients.
pub trait TopologyStore: Send + Sync {
    /// All hosts, in no particular order.
    fn list_hosts(&self, subject: &dyn Subject) -> Result<Vec<Host>, StoreError>;

    /// Host by id.
    ///
    /// # Errors
    /// - `InvalidId`: `id` is malformed or no host has it
    fn get_host(&self, subject: &dyn Subject, id: &str) -> Result<Host, StoreError>;

    /// Host by name.
    ///
    /// # Errors
    /// - `HostNotFound`: no host has that name
    fn get_host_by_name(&self, subject: &dyn Subject, name: &str) -> Result<Host, StoreError>;

    /// Insert a host under a freshly generated id, ignoring `host.id`.
    /// Returns the stored host. Publishes `hostadd`.
    fn add_host(&self, subject: &dyn Subject, host: Host) -> Result<Host, StoreError>;

    /// Remove a host and return it. Publishes `hostdelete`.
    ///
    /// # Errors
    /// - `HostNotFound`: `id` is malformed or no host has it
    fn delete_host(&self, subject: &dyn Subject, id: &str) -> Result<Host, StoreError>;

    /// All monitors, in no particular order.
    fn list_monitors(&self, subject: &dyn Subject) -> Result<Vec<Monitor>, StoreError>;

    /// Monitor by id.
    ///
    /// # Errors
    /// - `MonitorNotFound`: `id` is malformed or no monitor has it
    fn get_monitor(&self, subject: &dyn Subject, id: &str) -> Result<Monitor, StoreError>;

    /// Insert a monitor under a freshly generated id. Publishes `monadd`.
    fn add_monitor(&self, subject: &dyn Subject, monitor: Monitor) -> Result<Monitor, StoreError>;

    /// Store `monitor` under its own id, replacing any existing entry.
    ///
    /// This is an upsert: an id that is not present is inserted. Publishes
    /// `monchange`.
    ///
    /// # Errors
    /// - `InvalidId`: `monitor.id` is the nil id, which no monitor can have
    fn update_monitor(
        &self,
        subject: &dyn Subject,
        monitor: Monitor,
    ) -> Result<Monitor, StoreError>;

    /// Remove a monitor and return it. Publishes `mondelete`.
    ///
    /// # Errors
    /// - `MonitorNotFound`: `id` is malformed or no monitor has it
    fn delete_monitor(&self, subject: &dyn Subject, id: &str) -> Result<Monitor, StoreError>;

    /// Monitors attached to `host_id`.
    fn monitors_for_host(
        &self,
        subject: &dyn Subject,
        host_id: ObjectId,
    ) -> Result<Vec<Monitor>, StoreError> {
        let mut monitors = self.list_monitors(subject)?;
        monitors.retain(|m| m.host_id == host_id);
        Ok(monitors)
    }
}
