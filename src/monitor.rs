//! Monitor entity.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::id::ObjectId;
use crate::plugin::Agent;
use crate::time::{deserialize_interval, DEFAULT_INTERVAL};

/// The work a monitor runs on every tick.
#[derive(Clone)]
pub struct Job {
    /// Plugin id that selected [`Job::agent`].
    pub agent_id: String,

    /// Configured agent instance.
    pub agent: Arc<dyn Agent>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("agent_id", &self.agent_id)
            .field("agent", &self.agent)
            .finish()
    }
}

/// A periodic check of one host.
#[derive(Debug, Clone)]
pub struct Monitor {
    /// Identifier, unique among monitors.
    pub id: ObjectId,

    /// Host this monitor runs against.
    pub host_id: ObjectId,

    /// Time between runs.
    pub interval: Duration,
    /// Agent run on each tick.
    pub job: Job,
}

impl Monitor {
    /// Creates a monitor with a fresh id and the default interval.
    #[must_use]
    pub fn new(host_id: ObjectId, agent_id: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self {
            id: ObjectId::new(),
            host_id,
            interval: DEFAULT_INTERVAL,
            job: Job {
                agent_id: agent_id.into(),
                agent,
            },
        }
    }

    /// Builder-style interval override.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Host reference and agent selector, decoded before anything else.
#[derive(Debug, Deserialize)]
pub(crate) struct MonitorProxy {
    pub host: String,
    pub agent: String,
}

/// Monitor-level fields of a monitor record.
#[derive(Debug, Deserialize)]
pub(crate) struct MonitorRecord {
    #[serde(default = "default_interval", deserialize_with = "deserialize_interval")]
    pub interval: Duration,
}

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}
