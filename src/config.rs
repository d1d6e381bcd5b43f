//! Configuration for chunkwire
//!
//! Centralized configuration with sensible defaults.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::error::{ChunkError, Result};

/// Main configuration for a client or reference server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// Address of the remote chunk service (host:port)
    pub server_addr: String,

    /// Dial timeout (milliseconds). 0 blocks until the OS gives up.
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds). 0 means no deadline.
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds). 0 means no deadline.
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm on the connection
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Reference Server Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Worker threads serving accepted connections
    pub server_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8111".to_string(),
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            nodelay: true,
            listen_addr: "127.0.0.1:8111".to_string(),
            server_workers: 4,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve `server_addr` to the first socket address it names
    pub fn resolve_server_addr(&self) -> Result<SocketAddr> {
        resolve(&self.server_addr)
    }

    /// Resolve `listen_addr` to the first socket address it names
    pub fn resolve_listen_addr(&self) -> Result<SocketAddr> {
        resolve(&self.listen_addr)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|e| ChunkError::Config(format!("invalid address '{}': {}", addr, e)))?
        .next()
        .ok_or_else(|| ChunkError::Config(format!("address '{}' resolved to nothing", addr)))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the remote service address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the dial timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the TCP listen address of the reference server
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of reference server workers
    pub fn server_workers(mut self, count: usize) -> Self {
        self.config.server_workers = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
