use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

/// Wire protocol constants
pub mod protocol {
    use std::net::{IpAddr, Ipv4Addr};

    /// Registry: list every mapping
    pub const LIST: &str = "@";

    /// Registry: `?name` queries a single mapping
    pub const QUERY_PREFIX: char = '?';

    /// Registry: `!name:address` adds a mapping
    pub const ADD_PREFIX: char = '!';

    /// Separates name and address in an add command and a listing line
    pub const ADD_SEPARATOR: char = ':';

    /// Registry reply for a name with no mapping
    pub const NOT_FOUND: &str = ";";

    /// Service node: dump the visit log
    pub const LOG: &str = "log";

    /// Terminates a visit log dump
    pub const LOG_TERMINATOR: &str = ".";

    /// Every role talks over loopback
    pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Longest line a peer may send before the session is dropped
    pub const MAX_LINE_LEN: usize = 64 * 1024;
}

/// Listening configuration shared by the registry and service nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub listen_host: IpAddr,

    /// Listen port, 0 lets the OS pick an ephemeral one
    pub listen_port: u16,

    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_host: protocol::DEFAULT_HOST,
            listen_port: 0,
            verbose: false,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.listen_host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_host, self.listen_port)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Where the itinerant client dials registries and service nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: IpAddr,
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            verbose: false,
        }
    }
}

impl ClientConfig {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
