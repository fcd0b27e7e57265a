//! Raw configuration records and the two-pass decoder.
//!
//! A [`RawRecord`] is one untyped table from the configuration file. It can be
//! decoded any number of times into different target types; keys the target
//! does not know about are ignored. Entity loading relies on this: the same
//! record is decoded once into the entity's own fields, then again into the
//! plugin instance selected by one of those fields.

use serde::de::DeserializeOwned;

use crate::error::RecordError;

/// One untyped configuration table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    table: toml::Table,
}

impl RawRecord {
    /// Wraps a parsed table.
    #[must_use]
    pub fn new(table: toml::Table) -> Self {
        Self { table }
    }

    /// Builds a record from an arbitrary TOML value.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotATable` if the value is not a table.
    pub fn from_value(value: toml::Value) -> Result<Self, RecordError> {
        match value {
            toml::Value::Table(table) => Ok(Self { table }),
            other => Err(RecordError::NotATable {
                found: other.type_str(),
            }),
        }
    }

    /// Parses a record from TOML text. Mostly useful in tests and for plugins
    /// that keep their defaults as text.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Invalid` if the text is not valid TOML.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        let table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| RecordError::invalid(e.message()))?;
        Ok(Self { table })
    }

    /// Decodes the record into a fresh value of `T`.
    ///
    /// Unknown keys are ignored unless `T` opts into `deny_unknown_fields`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Invalid` when a known key has the wrong shape or a
    /// required key is missing.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        toml::Value::Table(self.table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| RecordError::invalid(e.message()))
    }

    /// Second decode pass: configures an already constructed instance.
    ///
    /// # Errors
    ///
    /// Propagates whatever the target's [`Configure`] implementation returns.
    pub fn decode_into<C: Configure + ?Sized>(&self, target: &mut C) -> Result<(), RecordError> {
        target.configure(self)
    }

    /// Raw access to a single key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.table.get(key)
    }

    /// Convenience accessor for string keys.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.table.get(key).and_then(toml::Value::as_str)
    }

    /// Keys present in the record, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Underlying table.
    #[must_use]
    pub fn as_table(&self) -> &toml::Table {
        &self.table
    }
}

impl From<toml::Table> for RawRecord {
    fn from(table: toml::Table) -> Self {
        Self::new(table)
    }
}

/// Specialized decode step for plugin instances.
///
/// Registry constructors return empty instances; the loader then hands the
/// entity's raw record to `configure` so plugin-specific keys are filled in.
/// Types that are plain serde structs can implement it in one line:
///
/// ```
/// use agento_topology::record::{Configure, RawRecord};
/// use agento_topology::error::RecordError;
///
/// #[derive(Debug, Default, serde::Deserialize)]
/// struct Ping {
///     #[serde(default)]
///     count: u32,
/// }
///
/// impl Configure for Ping {
///     fn configure(&mut self, record: &RawRecord) -> Result<(), RecordError> {
///         *self = record.decode()?;
///         Ok(())
///     }
/// }
///
/// let mut ping = Ping::default();
/// RawRecord::parse("agent = \"ping\"\ncount = 3").unwrap().decode_into(&mut ping).unwrap();
/// assert_eq!(ping.count, 3);
/// ```
pub trait Configure {
    /// Fills plugin-specific fields from `record`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` when the record does not match the plugin's schema.
    fn configure(&mut self, record: &RawRecord) -> Result<(), RecordError>;
}
