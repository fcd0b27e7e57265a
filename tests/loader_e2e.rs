use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use agento_topology::{
    Agent, Anonymous, ChangeHub, Configuration, ConfigurationStore, Configure, LoadError,
    NoopBroadcaster, ObjectId, PluginRegistry, RawRecord, RecordError, TopologyError,
    TopologyStore, Transport,
};

#[derive(Debug, Default)]
struct LocalTransport;

impl Configure for LocalTransport {
    fn configure(&mut self, _record: &RawRecord) -> Result<(), RecordError> {
        Ok(())
    }
}

impl Transport for LocalTransport {}

#[derive(Debug, Default, Deserialize)]
struct SshTransport {
    address: String,
    #[serde(default = "default_port")]
    port: u16,
}

fn default_port() -> u16 {
    22
}

impl Configure for SshTransport {
    fn configure(&mut self, record: &RawRecord) -> Result<(), RecordError> {
        *self = record.decode()?;
        Ok(())
    }
}

impl Transport for SshTransport {}

#[derive(Debug, Default, Deserialize)]
struct HttpAgent {
    url: String,
}

impl Configure for HttpAgent {
    fn configure(&mut self, record: &RawRecord) -> Result<(), RecordError> {
        *self = record.decode()?;
        Ok(())
    }
}

impl Agent for HttpAgent {}

#[derive(Debug, Default)]
struct LoadAgent;

impl Configure for LoadAgent {
    fn configure(&mut self, _record: &RawRecord) -> Result<(), RecordError> {
        Ok(())
    }
}

impl Agent for LoadAgent {}

fn registry() -> PluginRegistry {
    let mut plugins = PluginRegistry::new();
    plugins
        .register_transport("localhost", || -> Box<dyn Transport> { Box::new(LocalTransport) })
        .unwrap();
    plugins
        .register_transport("ssh", || -> Box<dyn Transport> { Box::new(SshTransport::default()) })
        .unwrap();
    plugins
        .register_agent("http", || -> Box<dyn Agent> { Box::new(HttpAgent::default()) })
        .unwrap();
    plugins
        .register_agent("load", || -> Box<dyn Agent> { Box::new(LoadAgent) })
        .unwrap();
    plugins
}

const CONFIG: &str = r#"
[hosts.localhost]
transport = "localhost"

[hosts.web1]
transport = "ssh"
address = "10.0.0.2"

[hosts.web2]
transport = "ssh"
address = "10.0.0.3"
port = 2222

[[monitors]]
host = "localhost"
agent = "load"

[[monitors]]
host = "web1"
agent = "http"
url = "http://10.0.0.2/health"
interval = "1m"

[[monitors]]
host = "web2"
agent = "load"
interval = 5
"#;

fn load(text: &str) -> Result<ConfigurationStore, LoadError> {
    let config = Configuration::from_toml_str(text).unwrap();
    ConfigurationStore::load(&config, &registry(), Arc::new(NoopBroadcaster))
}

fn localhost_with_monitor(host: &str, agent: &str) -> String {
    format!(
        "[hosts.localhost]\ntransport = \"localhost\"\n\n\
         [[monitors]]\nhost = \"{host}\"\nagent = \"{agent}\"\n"
    )
}

#[test]
fn loads_full_topology() {
    let store = load(CONFIG).unwrap();
    assert_eq!(store.host_count().unwrap(), 3);
    assert_eq!(store.monitor_count().unwrap(), 3);

    let localhost = store.get_host_by_name(&Anonymous, "localhost").unwrap();
    assert_eq!(localhost.id, ObjectId::LOCALHOST);
    assert_eq!(localhost.id.to_hex(), "000000000000000000000000");
    assert!(localhost.is_localhost());

    let by_id = store.get_host(&Anonymous, "000000000000000000000000").unwrap();
    assert_eq!(by_id.name, "localhost");
}

#[test]
fn non_localhost_ids_are_distinct() {
    let store = load(CONFIG).unwrap();
    let hosts = store.list_hosts(&Anonymous).unwrap();
    let ids: HashSet<ObjectId> = hosts.iter().map(|h| h.id).collect();
    assert_eq!(ids.len(), hosts.len());
    for h in hosts.iter().filter(|h| h.name != "localhost") {
        assert!(!h.id.is_nil());
    }
}

#[test]
fn transport_fields_come_from_second_decode() {
    let store = load(CONFIG).unwrap();

    let web1 = store.get_host_by_name(&Anonymous, "web1").unwrap();
    assert_eq!(web1.transport_id, "ssh");
    let debug = format!("{:?}", web1.transport);
    assert!(debug.contains("10.0.0.2"));
    assert!(debug.contains("port: 22"));

    let web2 = store.get_host_by_name(&Anonymous, "web2").unwrap();
    assert!(format!("{:?}", web2.transport).contains("port: 2222"));
}

#[test]
fn monitors_reference_hosts_by_id() {
    let store = load(CONFIG).unwrap();
    let web1 = store.get_host_by_name(&Anonymous, "web1").unwrap();

    let monitors = store.monitors_for_host(&Anonymous, web1.id).unwrap();
    assert_eq!(monitors.len(), 1);
    assert_eq!(monitors[0].job.agent_id, "http");
    assert!(format!("{:?}", monitors[0].job.agent).contains("http://10.0.0.2/health"));
}

#[test]
fn interval_defaults_and_overrides() {
    let store = load(CONFIG).unwrap();
    let interval_of = |name: &str| {
        let host = store.get_host_by_name(&Anonymous, name).unwrap();
        store.monitors_for_host(&Anonymous, host.id).unwrap()[0].interval
    };

    assert_eq!(interval_of("localhost"), Duration::from_secs(10));
    assert_eq!(interval_of("web1"), Duration::from_secs(60));
    assert_eq!(interval_of("web2"), Duration::from_secs(5));
}

#[test]
fn unknown_transport_aborts_load() {
    let err = load(
        r#"
[hosts.localhost]
transport = "localhost"

[hosts.legacy]
transport = "telnet"

[[monitors]]
host = "localhost"
agent = "load"
"#,
    )
    .unwrap_err();

    match err {
        LoadError::UnknownTransport { host, transport } => {
            assert_eq!(host, "legacy");
            assert_eq!(transport, "telnet");
        }
        other => panic!("expected unknown transport, got {other:?}"),
    }
}

#[test]
fn unknown_agent_aborts_load() {
    let err = load(&localhost_with_monitor("localhost", "snmp")).unwrap_err();
    assert!(matches!(err, LoadError::UnknownAgent { ref agent } if agent == "snmp"));
}

#[test]
fn monitor_with_missing_host_aborts_load() {
    let err = load(&localhost_with_monitor("db1", "load")).unwrap_err();
    assert!(matches!(err, LoadError::HostNotFound { ref name } if name == "db1"));
}

#[test]
fn agent_schema_mismatch_is_a_load_error() {
    let err = load(&localhost_with_monitor("localhost", "http")).unwrap_err();
    assert!(matches!(err, LoadError::PluginDecode { ref plugin, .. } if plugin == "http"));
}

#[test]
fn from_path_reports_config_and_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    let plugins = registry();

    let good = dir.path().join("agento.conf");
    std::fs::write(&good, CONFIG).unwrap();
    let hub = Arc::new(ChangeHub::default());
    let store = ConfigurationStore::from_path(&good, &plugins, hub.clone()).unwrap();
    assert_eq!(store.host_count().unwrap(), 3);
    assert_eq!(hub.published(), 0);

    let bad = dir.path().join("bad.conf");
    std::fs::write(&bad, "[[monitors]]\nhost = \"nowhere\"\nagent = \"load\"\n").unwrap();
    let err = ConfigurationStore::from_path(&bad, &plugins, Arc::new(NoopBroadcaster)).unwrap_err();
    assert!(err.is_load());
    assert!(err.is_not_found());

    let missing = dir.path().join("missing.conf");
    let err =
        ConfigurationStore::from_path(&missing, &plugins, Arc::new(NoopBroadcaster)).unwrap_err();
    assert!(matches!(err, TopologyError::Config(_)));
}
