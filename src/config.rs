//! Configuration source.
//!
//! The Agento configuration file is TOML. Only two sections matter here:
//!
//! ```toml
//! [hosts.web1]            # one table per host, keyed by host name
//! transport = "ssh"       # transport selector
//! address = "10.0.0.2"    # transport-specific keys
//!
//! [[monitors]]            # one table per monitor
//! host = "web1"           # host reference by name
//! agent = "load"          # agent selector
//! interval = "30s"        # optional, defaults to 10 seconds
//! ```
//!
//! `monitors` may also be written as named tables (`[monitors.web1-load]`);
//! the names are labels only. Every other section is left to other
//! subsystems and ignored.

use std::path::Path;

use crate::error::{ConfigError, RecordError};
use crate::record::RawRecord;

const HOSTS_SECTION: &str = "hosts";
const MONITORS_SECTION: &str = "monitors";

/// Host and monitor records extracted from a configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    hosts: Vec<(String, RawRecord)>,
    monitors: Vec<RawRecord>,
}

impl Configuration {
    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for invalid TOML and
    /// `ConfigError::SectionShape` when a section has the wrong structure.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut root: toml::Table = text.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let hosts = match root.remove(HOSTS_SECTION) {
            None => Vec::new(),
            Some(toml::Value::Table(table)) => table
                .into_iter()
                .map(|(name, value)| {
                    RawRecord::from_value(value)
                        .map(|record| (name, record))
                        .map_err(|_| shape_error(HOSTS_SECTION, "a table per host"))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?,
            Some(_) => return Err(shape_error(HOSTS_SECTION, "a table of host tables")),
        };

        let monitors = match root.remove(MONITORS_SECTION) {
            None => Vec::new(),
            Some(toml::Value::Array(items)) => collect_monitors(items)?,
            Some(toml::Value::Table(table)) => collect_monitors(table.into_iter().map(|(_, v)| v))?,
            Some(_) => {
                return Err(shape_error(
                    MONITORS_SECTION,
                    "an array of tables or a table of tables",
                ))
            }
        };

        Ok(Self { hosts, monitors })
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, otherwise the
    /// same errors as [`Configuration::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build a configuration from already decomposed records.
    #[must_use]
    pub fn from_records(hosts: Vec<(String, RawRecord)>, monitors: Vec<RawRecord>) -> Self {
        Self { hosts, monitors }
    }

    /// Host records keyed by host name.
    #[must_use]
    pub fn hosts(&self) -> &[(String, RawRecord)] {
        &self.hosts
    }

    /// Monitor records.
    #[must_use]
    pub fn monitors(&self) -> &[RawRecord] {
        &self.monitors
    }
}

fn shape_error(section: &'static str, expected: &'static str) -> ConfigError {
    ConfigError::SectionShape { section, expected }
}

fn collect_monitors(
    items: impl IntoIterator<Item = toml::Value>,
) -> Result<Vec<RawRecord>, ConfigError> {
    items
        .into_iter()
        .map(|value| {
            RawRecord::from_value(value)
                .map_err(|_: RecordError| shape_error(MONITORS_SECTION, "a table per monitor"))
        })
        .collect()
}
