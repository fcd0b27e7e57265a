//! Plugin capabilities and the constructor registry.
//!
//! Hosts carry a [`Transport`] and monitors carry an [`Agent`]. Both are
//! selected at load time by a string id from the configuration. Concrete
//! plugins live outside this crate; they register a zero-argument constructor
//! with a [`PluginRegistry`], and the loader configures the returned instance
//! from the entity's record (see [`Configure`]).

use std::collections::BTreeMap;
use std::fmt;

use crate::error::RegistryError;
use crate::record::Configure;

/// A way of reaching a host (local exec, ssh, ...).
pub trait Transport: Configure + fmt::Debug + Send + Sync {}

/// A check executed against a host by the scheduler.
pub trait Agent: Configure + fmt::Debug + Send + Sync {}

/// Builds an empty, unconfigured transport.
pub type TransportConstructor = fn() -> Box<dyn Transport>;

/// Builds an empty, unconfigured agent.
pub type AgentConstructor = fn() -> Box<dyn Agent>;

/// String-keyed constructor tables for transports and agents.
///
/// The registry is built once during startup and then only read, so it is
/// passed by reference to the loader rather than held in global state.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    transports: BTreeMap<String, TransportConstructor>,
    agents: BTreeMap<String, AgentConstructor>,
}

impl PluginRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport constructor under `id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateTransport` if `id` is taken.
    pub fn register_transport(
        &mut self,
        id: impl Into<String>,
        construct: TransportConstructor,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        if self.transports.contains_key(&id) {
            return Err(RegistryError::DuplicateTransport { id });
        }
        self.transports.insert(id, construct);
        Ok(())
    }

    /// Register an agent constructor under `id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateAgent` if `id` is taken.
    pub fn register_agent(
        &mut self,
        id: impl Into<String>,
        construct: AgentConstructor,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        if self.agents.contains_key(&id) {
            return Err(RegistryError::DuplicateAgent { id });
        }
        self.agents.insert(id, construct);
        Ok(())
    }

    /// Look up a transport constructor.
    #[must_use]
    pub fn transport(&self, id: &str) -> Option<TransportConstructor> {
        self.transports.get(id).copied()
    }

    /// Look up an agent constructor.
    #[must_use]
    pub fn agent(&self, id: &str) -> Option<AgentConstructor> {
        self.agents.get(id).copied()
    }

    /// Registered transport ids, sorted.
    #[must_use]
    pub fn transport_ids(&self) -> Vec<String> {
        self.transports.keys().cloned().collect()
    }

    /// Registered agent ids, sorted.
    #[must_use]
    pub fn agent_ids(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("transports", &self.transports.keys().collect::<Vec<_>>())
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::error::RecordError;
    use crate::record::RawRecord;

    #[derive(Debug)]
    struct Local;

    impl Configure for Local {
        fn configure(&mut self, _record: &RawRecord) -> Result<(), RecordError> {
            Ok(())
        }
    }

    impl Transport for Local {}

    #[derive(Debug, Default, Deserialize)]
    struct Load {
        #[serde(default)]
        cores: u32,
    }

    impl Configure for Load {
        fn configure(&mut self, record: &RawRecord) -> Result<(), RecordError> {
            *self = record.decode()?;
            Ok(())
        }
    }

    impl Agent for Load {}

    fn local() -> Box<dyn Transport> {
        Box::new(Local)
    }

    fn load() -> Box<dyn Agent> {
        Box::new(Load::default())
    }

    #[test]
    fn lookup_returns_registered_constructors() {
        let mut registry = PluginRegistry::new();
        registry.register_transport("localhost", local).unwrap();
        registry.register_agent("load", load).unwrap();

        assert!(registry.transport("localhost").is_some());
        assert!(registry.transport("ssh").is_none());
        assert!(registry.agent("load").is_some());
        assert!(registry.agent("localhost").is_none());
        assert_eq!(registry.transport_ids(), vec!["localhost".to_string()]);
        assert_eq!(registry.agent_ids(), vec!["load".to_string()]);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register_agent("load", load).unwrap();
        let err = registry.register_agent("load", load).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateAgent { id } if id == "load"));
    }

    #[test]
    fn constructed_instance_is_configured_in_second_pass() {
        let mut registry = PluginRegistry::new();
        registry.register_agent("load", load).unwrap();

        let record = RawRecord::parse("agent = \"load\"\nhost = \"web1\"\ncores = 4").unwrap();
        let construct = registry.agent("load").unwrap();
        let mut agent = construct();
        record.decode_into(agent.as_mut()).unwrap();
        assert!(format!("{agent:?}").contains("cores: 4"));
    }
}
