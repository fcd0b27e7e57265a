use std::fmt::Write as _;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use agento_topology::{
    Agent, Anonymous, ChangeHub, ConfigurationStore, Configuration, Configure, Monitor, ObjectId,
    PluginRegistry, RawRecord, RecordError, TopologyStore, Transport,
};

#[derive(Debug)]
struct Local;

impl Configure for Local {
    fn configure(&mut self, _record: &RawRecord) -> Result<(), RecordError> {
        Ok(())
    }
}

impl Transport for Local {}

#[derive(Debug)]
struct Ping;

impl Configure for Ping {
    fn configure(&mut self, _record: &RawRecord) -> Result<(), RecordError> {
        Ok(())
    }
}

impl Agent for Ping {}

fn plugins() -> PluginRegistry {
    let mut plugins = PluginRegistry::new();
    plugins
        .register_transport("localhost", || -> Box<dyn Transport> { Box::new(Local) })
        .unwrap();
    plugins
        .register_agent("ping", || -> Box<dyn Agent> { Box::new(Ping) })
        .unwrap();
    plugins
}

/// 64 hosts with 4 monitors each.
fn config_text() -> String {
    let mut text = String::new();
    for h in 0..64 {
        let _ = writeln!(text, "[hosts.host{h}]\ntransport = \"localhost\"\n");
    }
    for h in 0..64 {
        for _ in 0..4 {
            let _ = writeln!(
                text,
                "[[monitors]]\nhost = \"host{h}\"\nagent = \"ping\"\ninterval = \"30s\"\n"
            );
        }
    }
    text
}

fn bench_load(c: &mut Criterion) {
    let config = Configuration::from_toml_str(&config_text()).unwrap();
    let plugins = plugins();

    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Elements(64 + 256));
    group.bench_function("64_hosts_256_monitors", |b| {
        b.iter(|| {
            ConfigurationStore::load(&config, &plugins, Arc::new(ChangeHub::default())).unwrap()
        });
    });
    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let config = Configuration::from_toml_str(&config_text()).unwrap();
    let store =
        ConfigurationStore::load(&config, &plugins(), Arc::new(ChangeHub::default())).unwrap();
    let host = store.get_host_by_name(&Anonymous, "host32").unwrap();
    let id = host.id.to_hex();

    let mut group = c.benchmark_group("reads");
    group.throughput(Throughput::Elements(1));
    group.bench_function("get_host", |b| {
        b.iter(|| store.get_host(&Anonymous, &id).unwrap());
    });
    group.bench_function("get_host_by_name", |b| {
        b.iter(|| store.get_host_by_name(&Anonymous, "host32").unwrap());
    });
    group.bench_function("list_monitors", |b| {
        b.iter(|| store.list_monitors(&Anonymous).unwrap());
    });
    group.finish();
}

fn bench_writes(c: &mut Criterion) {
    let hub = Arc::new(ChangeHub::default());
    let store =
        ConfigurationStore::load(&Configuration::default(), &plugins(), hub.clone()).unwrap();
    let _slow_subscriber = hub.subscribe();

    let mut group = c.benchmark_group("writes");
    group.throughput(Throughput::Elements(1));
    group.bench_function("add_then_delete_monitor", |b| {
        b.iter(|| {
            let m = store
                .add_monitor(&Anonymous, Monitor::new(ObjectId::LOCALHOST, "ping", Arc::new(Ping)))
                .unwrap();
            store.delete_monitor(&Anonymous, &m.id.to_hex()).unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_load, bench_reads, bench_writes);
criterion_main!(benches);
