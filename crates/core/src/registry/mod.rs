//! Registry: the directory mapping logical names to service node addresses
//!
//! - `table`: the insertion-ordered, add-only mapping
//! - `server`: concurrent line protocol server around one table
//! - `client`: add/query/list from the node and client side

mod client;
mod server;
mod table;

pub use client::{RegistryClient, RegistryClientError};
pub use server::RegistryServer;
pub use table::{AddOutcome, LookupError, RegistryEntry, RegistryTable};
