//! Wire grammar for the registry and service node protocols
//!
//! Lines are classified once into a command variant; servers dispatch on the
//! variant and never look at raw text again.

pub mod messages;

pub use messages::{NodeCommand, RegistryCommand};
