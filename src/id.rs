//! Entity identifiers.
//!
//! Hosts and monitors are identified by 12-byte object ids, rendered as 24
//! lowercase hex characters. The layout is the usual object id scheme:
//!
//! - bytes 0..4: creation time, unix seconds, big-endian
//! - bytes 4..9: random per-process value
//! - bytes 9..12: counter, big-endian, seeded randomly
//!
//! One value is reserved: the host named `localhost` always gets the all-zero
//! id. The scheduler and the web client hardcode that id, so the rule lives
//! here and nowhere else (see [`assign_host_id`]).

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Name of the host that receives [`ObjectId::LOCALHOST`].
pub const LOCALHOST_NAME: &str = "localhost";

/// A 12-byte entity identifier.
///
/// # Examples
///
/// ```
/// use agento_topology::ObjectId;
///
/// let id = ObjectId::new();
/// let parsed: ObjectId = id.to_hex().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

/// Error returned when parsing a malformed identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid object id '{input}': expected 24 hex characters")]
pub struct ParseObjectIdError {
    input: String,
}

struct Generator {
    process: [u8; 5],
    counter: AtomicU32,
}

fn generator() -> &'static Generator {
    static GENERATOR: OnceLock<Generator> = OnceLock::new();
    GENERATOR.get_or_init(|| {
        let seed = Uuid::new_v4();
        let bytes = seed.as_bytes();
        let mut process = [0u8; 5];
        process.copy_from_slice(&bytes[..5]);
        let counter = u32::from_be_bytes([0, bytes[5], bytes[6], bytes[7]]);
        Generator {
            process,
            counter: AtomicU32::new(counter),
        }
    })
}

impl ObjectId {
    /// The reserved identifier of the `localhost` host.
    pub const LOCALHOST: Self = Self([0; 12]);

    /// Generates a fresh identifier.
    ///
    /// Identifiers generated by one process never repeat until the 24-bit
    /// counter wraps within a single second.
    #[must_use]
    pub fn new() -> Self {
        let gen = generator();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let secs = Utc::now().timestamp() as u32;
        let count = gen.counter.fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&gen.process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Wraps raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Parses a 24-character hex string.
    ///
    /// # Errors
    ///
    /// Returns `ParseObjectIdError` on wrong length or non-hex input.
    pub fn parse_hex(s: &str) -> Result<Self, ParseObjectIdError> {
        let err = || ParseObjectIdError { input: s.to_string() };
        if s.len() != 24 {
            return Err(err());
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| err())?;
        Ok(Self(bytes))
    }

    /// Lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns true for the all-zero identifier.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [0; 12]
    }

    /// Creation time encoded in the identifier.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Assigns the identifier for a host loaded from configuration.
///
/// `localhost` maps to [`ObjectId::LOCALHOST`]; every other name gets a fresh id.
#[must_use]
pub fn assign_host_id(name: &str) -> ObjectId {
    if name == LOCALHOST_NAME {
        ObjectId::LOCALHOST
    } else {
        ObjectId::new()
    }
}
