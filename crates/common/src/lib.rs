//! Shared types for the flightmap registry, service nodes and client
//!
//! Everything that crosses a process boundary is validated here once, so the
//! servers and the client only ever handle well-formed ports and fields.

pub mod config;
pub mod error;
pub mod types;

pub use config::{protocol, ClientConfig, ConfigError, ServerConfig};
pub use error::{FlightmapError, Result};
pub use types::{
    validate_field, validate_name, Address, Destination, FieldError, Port, PortError,
};
