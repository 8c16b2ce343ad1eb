//! flightmap daemon library
//!
//! Command line grammar and exit statuses shared by the `flightmap` binary's
//! mapper, control and roc roles.

pub mod cli;
pub mod exit;

pub use cli::{Cli, Command};
pub use exit::{ControlExit, ExitStatus, MapperExit, RocExit};
