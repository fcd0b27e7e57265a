//! # agento-topology
//!
//! In-memory registry of the hosts and monitors an Agento installation watches.
//! The registry is materialized from the `hosts` and `monitors` sections of the
//! configuration file and then serves API handlers and the scheduler.
//!
//! ## Core Concepts
//!
//! - **Host**: a machine, reached through a [`Transport`] plugin
//! - **Monitor**: a periodic [`Agent`] run against one host
//! - **Plugin id**: string selecting the transport or agent implementation
//! - **Change event**: `hostadd`, `hostdelete`, `monadd`, `monchange` or
//!   `mondelete`, published after every mutation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agento_topology::{Anonymous, ChangeHub, ConfigurationStore, PluginRegistry, TopologyStore};
//!
//! let mut plugins = PluginRegistry::new();
//! plugins.register_transport("ssh", ssh::construct)?;
//! plugins.register_agent("load", load::construct)?;
//!
//! let hub = Arc::new(ChangeHub::default());
//! let store = ConfigurationStore::from_path("/etc/agento.conf", &plugins, hub.clone())?;
//! let changes = hub.subscribe();
//!
//! let localhost = store.get_host(&Anonymous, "000000000000000000000000")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod changes;
pub mod config;
pub mod error;
pub mod host;
pub mod id;
pub mod monitor;
pub mod plugin;
pub mod record;
pub mod store;
pub mod subject;
pub mod time;

// Re-export primary types at crate root for convenience
pub use changes::{
    Broadcaster, ChangeEvent, ChangeHub, ChangeHubConfig, ChangeKind, ChangeStream,
    NoopBroadcaster,
};
pub use config::Configuration;
pub use error::{
    ConfigError, LoadError, RecordError, RegistryError, StoreError, StreamError, TopologyError,
    TopologyResult,
};
pub use host::Host;
pub use id::{assign_host_id, ObjectId, LOCALHOST_NAME};
pub use monitor::{Job, Monitor};
pub use plugin::{Agent, AgentConstructor, PluginRegistry, Transport, TransportConstructor};
pub use record::{Configure, RawRecord};
pub use store::{ConfigurationStore, TopologyStore};
pub use subject::{Anonymous, Subject};
pub use time::DEFAULT_INTERVAL;
