//! Service nodes
//!
//! A node answers each visit with its static info and records who visited.
//! It can register itself with a registry so clients find it by name.

mod client;
mod log;
mod server;

pub use client::{NodeClient, NodeClientError};
pub use log::{VisitLog, VisitRecord};
pub use server::{NodeIdentity, Registration, ServiceNode};
