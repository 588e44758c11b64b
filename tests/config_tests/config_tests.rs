//! Config Tests
//!
//! Tests for defaults, the builder, and environment overrides.

use std::collections::HashMap;
use std::time::Duration;

use pyrokv::config::{ClientConfigBuilder, HOST_ENV, HOST_ENV_ALIAS, PORT_ENV, PORT_ENV_ALIAS};
use pyrokv::protocol::MAX_PAYLOAD_SIZE;
use pyrokv::{ClientConfig, PyroError};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_defaults() {
    let config = ClientConfig::default();

    assert_eq!(config.addr(), "localhost:8001");
    assert_eq!(config.request_timeout(), Duration::from_secs(2));
    assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    assert_eq!(config.write_timeout(), Some(Duration::from_secs(5)));
    assert_eq!(config.max_payload_size, MAX_PAYLOAD_SIZE);
    assert!(config.nodelay);
}

#[test]
fn test_builder() {
    let config = ClientConfig::builder()
        .host("10.0.0.5")
        .port(9100)
        .request_timeout_ms(250)
        .connect_timeout_ms(100)
        .write_timeout_ms(0)
        .max_payload_size(4096)
        .read_buffer_size(512)
        .nodelay(false)
        .build();

    assert_eq!(config.addr(), "10.0.0.5:9100");
    assert_eq!(config.request_timeout(), Duration::from_millis(250));
    assert_eq!(config.connect_timeout(), Duration::from_millis(100));
    assert_eq!(config.write_timeout(), None);
    assert_eq!(config.max_payload_size, 4096);
    assert_eq!(config.read_buffer_size, 512);
    assert!(!config.nodelay);
}

#[test]
fn test_env_overrides() {
    let config =
        ClientConfig::from_lookup(lookup_from(&[(HOST_ENV, "kv.internal"), (PORT_ENV, "7000")]))
            .unwrap();

    assert_eq!(config.host, "kv.internal");
    assert_eq!(config.port, 7000);
}

#[test]
fn test_env_reads_mcqueen_names() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        ("MCQUEEN_HOST", "kv.example"),
        ("MCQUEEN_PORT", "9999"),
    ]))
    .unwrap();

    assert_eq!(config.addr(), "kv.example:9999");
}

#[test]
fn test_env_alias_fallback() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        (HOST_ENV_ALIAS, "alias.internal"),
        (PORT_ENV_ALIAS, "7100"),
    ]))
    .unwrap();

    assert_eq!(config.addr(), "alias.internal:7100");
}

#[test]
fn test_env_primary_wins_over_alias() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        (HOST_ENV, "primary"),
        (PORT_ENV, "7000"),
        (HOST_ENV_ALIAS, "alias"),
        (PORT_ENV_ALIAS, "not-a-port"),
    ]))
    .unwrap();

    assert_eq!(config.addr(), "primary:7000");
}

#[test]
fn test_env_missing_uses_defaults() {
    let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.addr(), "localhost:8001");
}

#[test]
fn test_env_empty_host_ignored() {
    let config = ClientConfig::from_lookup(lookup_from(&[(HOST_ENV, "")])).unwrap();
    assert_eq!(config.host, "localhost");
}

#[test]
fn test_env_invalid_port() {
    let result = ClientConfig::from_lookup(lookup_from(&[(PORT_ENV, "eighty")]));
    assert!(matches!(result, Err(PyroError::Config(_))));

    let result = ClientConfig::from_lookup(lookup_from(&[(PORT_ENV, "70000")]));
    assert!(matches!(result, Err(PyroError::Config(_))));

    let result = ClientConfig::from_lookup(lookup_from(&[(PORT_ENV_ALIAS, "eighty")]));
    assert!(matches!(result, Err(PyroError::Config(msg)) if msg.contains(PORT_ENV_ALIAS)));
}

#[test]
fn test_builder_from_existing_config() {
    let base = ClientConfig::from_lookup(lookup_from(&[(PORT_ENV, "9999")])).unwrap();
    let config = ClientConfigBuilder::from_config(base).request_timeout_ms(10).build();

    assert_eq!(config.port, 9999);
    assert_eq!(config.request_timeout_ms, 10);
}
