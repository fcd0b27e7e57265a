//! Error types for the topology store.
//!
//! Errors come in two tiers. Load errors abort construction of a store from a
//! configuration snapshot; no partially populated store is ever returned.
//! Store errors are ordinary results of runtime queries and mutations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding a raw configuration record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Record is not a table (found {found})")]
    NotATable {
        found: &'static str,
    },

    #[error("Failed to decode record: {message}")]
    Invalid {
        message: String,
    },
}

impl RecordError {
    /// Creates a decode error from any displayable cause.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Errors raised while reading the configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {message}")]
    Parse {
        message: String,
    },

    #[error("Section '{section}' has an unexpected shape: expected {expected}")]
    SectionShape {
        section: &'static str,
        expected: &'static str,
    },
}

/// Errors raised while registering plugins.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Transport '{id}' is already registered")]
    DuplicateTransport {
        id: String,
    },

    #[error("Agent '{id}' is already registered")]
    DuplicateAgent {
        id: String,
    },
}

/// Load-time errors. Any of these aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Host '{host}' uses unknown transport '{transport}'")]
    UnknownTransport {
        host: String,
        transport: String,
    },

    #[error("Monitor references unknown agent '{agent}'")]
    UnknownAgent {
        agent: String,
    },

    #[error("Monitor references host '{name}' which is not configured")]
    HostNotFound {
        name: String,
    },

    #[error("Invalid {entity} record: {source}")]
    Decode {
        entity: String,
        #[source]
        source: RecordError,
    },

    #[error("Plugin '{plugin}' rejected configuration of {entity}: {source}")]
    PluginDecode {
        entity: String,
        plugin: String,
        #[source]
        source: RecordError,
    },
}

/// Runtime query and mutation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Host not found: {key}")]
    HostNotFound {
        key: String,
    },

    #[error("Monitor not found: {id}")]
    MonitorNotFound {
        id: String,
    },

    #[error("Invalid id: {id}")]
    InvalidId {
        id: String,
    },

    #[error("Storage backend error: {message}")]
    Backend {
        message: String,
    },
}

impl StoreError {
    pub(crate) fn host_not_found(key: impl Into<String>) -> Self {
        Self::HostNotFound { key: key.into() }
    }

    pub(crate) fn monitor_not_found(id: impl Into<String>) -> Self {
        Self::MonitorNotFound { id: id.into() }
    }

    pub(crate) fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }
}

/// Errors returned by change subscription streams.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    #[error("Change stream disconnected")]
    Disconnected,

    #[error("No change event within {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },

    #[error("No change event pending")]
    Empty,
}

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
}

impl TopologyError {
    /// Returns true if this error aborted loading a configuration snapshot.
    #[must_use]
    pub const fn is_load(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Load(_))
    }

    /// Returns true if this is a runtime store error.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns true if the error means a looked-up entity does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::HostNotFound { .. } | StoreError::MonitorNotFound { .. })
                | Self::Load(LoadError::HostNotFound { .. })
        )
    }
}

/// Result type alias for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;
