//! Configuration for the PyroKV client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{PyroError, Result};
use crate::protocol::MAX_PAYLOAD_SIZE;

/// Environment variable overriding the server host
pub const HOST_ENV: &str = "MCQUEEN_HOST";

/// Environment variable overriding the server port
pub const PORT_ENV: &str = "MCQUEEN_PORT";

/// Fallback for [`HOST_ENV`], consulted only when it is unset
pub const HOST_ENV_ALIAS: &str = "PYROKV_HOST";

/// Fallback for [`PORT_ENV`], consulted only when it is unset
pub const PORT_ENV_ALIAS: &str = "PYROKV_PORT";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Server Address
    // -------------------------------------------------------------------------
    /// Server host name or IP
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// How long a request waits for its response (milliseconds)
    pub request_timeout_ms: u64,

    /// TCP connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Stream Configuration
    // -------------------------------------------------------------------------
    /// Largest inbound payload accepted before the stream is considered corrupt
    pub max_payload_size: u32,

    /// Size of each read from the socket
    pub read_buffer_size: usize,

    /// Disable Nagle's algorithm
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8001,
            request_timeout_ms: 2000,
            connect_timeout_ms: 5000,
            write_timeout_ms: 5000,
            max_payload_size: MAX_PAYLOAD_SIZE,
            read_buffer_size: 64 * 1024, // 64 KB
            nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Defaults overridden by `MCQUEEN_HOST` / `MCQUEEN_PORT`
    ///
    /// `PYROKV_HOST` / `PYROKV_PORT` are read when the primary names are unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the env names
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let first_set = |names: [&'static str; 2]| {
            names
                .into_iter()
                .find_map(|name| lookup(name).map(|value| (name, value)))
        };

        if let Some((_, host)) = first_set([HOST_ENV, HOST_ENV_ALIAS]) {
            if !host.is_empty() {
                config.host = host;
            }
        }
        if let Some((name, port)) = first_set([PORT_ENV, PORT_ENV_ALIAS]) {
            config.port = port.trim().parse().map_err(|e| {
                PyroError::Config(format!("invalid {}={:?}: {}", name, port, e))
            })?;
        }

        Ok(config)
    }

    /// `host:port` string for dialing
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Start from an existing config (e.g. one loaded from the environment)
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the per-request timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 disables)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn max_payload_size(mut self, bytes: u32) -> Self {
        self.config.max_payload_size = bytes;
        self
    }

    pub fn read_buffer_size(mut self, bytes: usize) -> Self {
        self.config.read_buffer_size = bytes;
        self
    }

    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
