//! Builds store state from a configuration snapshot.
//!
//! Hosts are loaded before monitors because monitors name their host. Each
//! entity goes through the same steps: decode the common fields, pick a
//! plugin constructor by id, construct an empty instance, then decode the
//! same record again into that instance.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::LoadError;
use crate::host::{Host, HostRecord};
use crate::id::{assign_host_id, ObjectId};
use crate::monitor::{Job, Monitor, MonitorProxy, MonitorRecord};
use crate::plugin::{Agent, PluginRegistry, Transport};
use crate::record::RawRecord;

use super::configuration::TopologyState;

pub(crate) fn load_state(
    config: &Configuration,
    plugins: &PluginRegistry,
) -> Result<TopologyState, LoadError> {
    let mut state = TopologyState::default();

    for (name, record) in config.hosts() {
        let host = resolve_host(name, record, plugins)?;
        debug!(host = %host.name, id = %host.id, transport = %host.transport_id, "loaded host");
        state.hosts.insert(host.id, host);
    }

    for record in config.monitors() {
        let monitor = resolve_monitor(record, &state, plugins)?;
        debug!(
            id = %monitor.id,
            host_id = %monitor.host_id,
            agent = %monitor.job.agent_id,
            "loaded monitor"
        );
        state.monitors.insert(monitor.id, monitor);
    }

    info!(
        hosts = state.hosts.len(),
        monitors = state.monitors.len(),
        "topology loaded from configuration"
    );
    Ok(state)
}

fn resolve_host(
    name: &str,
    record: &RawRecord,
    plugins: &PluginRegistry,
) -> Result<Host, LoadError> {
    let entity = format!("host '{name}'");

    let base: HostRecord = record.decode().map_err(|source| LoadError::Decode {
        entity: entity.clone(),
        source,
    })?;

    let id = assign_host_id(name);

    let construct = plugins
        .transport(&base.transport)
        .ok_or_else(|| LoadError::UnknownTransport {
            host: name.to_string(),
            transport: base.transport.clone(),
        })?;

    let mut transport = construct();
    record
        .decode_into(transport.as_mut())
        .map_err(|source| LoadError::PluginDecode {
            entity,
            plugin: base.transport.clone(),
            source,
        })?;

    Ok(Host {
        id,
        name: name.to_string(),
        transport_id: base.transport,
        transport: Arc::<dyn Transport>::from(transport),
    })
}

fn resolve_monitor(
    record: &RawRecord,
    state: &TopologyState,
    plugins: &PluginRegistry,
) -> Result<Monitor, LoadError> {
    let proxy: MonitorProxy = record.decode().map_err(|source| LoadError::Decode {
        entity: "monitor".to_string(),
        source,
    })?;

    let host_id = state
        .host_by_name(&proxy.host)
        .map(|h| h.id)
        .ok_or_else(|| LoadError::HostNotFound {
            name: proxy.host.clone(),
        })?;

    let entity = format!("monitor of host '{}'", proxy.host);
    let fields: MonitorRecord = record.decode().map_err(|source| LoadError::Decode {
        entity: entity.clone(),
        source,
    })?;

    let id = ObjectId::new();

    let construct = plugins
        .agent(&proxy.agent)
        .ok_or_else(|| LoadError::UnknownAgent {
            agent: proxy.agent.clone(),
        })?;

    let mut agent = construct();
    record
        .decode_into(agent.as_mut())
        .map_err(|source| LoadError::PluginDecode {
            entity,
            plugin: proxy.agent.clone(),
            source,
        })?;

    Ok(Monitor {
        id,
        host_id,
        interval: fields.interval,
        job: Job {
            agent_id: proxy.agent,
            agent: Arc::<dyn Agent>::from(agent),
        },
    })
}
