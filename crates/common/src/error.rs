use thiserror::Error;

/// Common error types for flightmap
#[derive(Debug, Error)]
pub enum FlightmapError {
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),
}

/// Result type for flightmap operations
pub type Result<T> = std::result::Result<T, FlightmapError>;

impl FlightmapError {
    pub fn registry_unavailable(msg: impl Into<String>) -> Self {
        Self::RegistryUnavailable(msg.into())
    }
}
