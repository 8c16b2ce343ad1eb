//! Command line grammar for the `flightmap` binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flightmap")]
#[command(version, about = "Registry, service nodes and itinerant clients over a line protocol")]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the name registry (mapper); prints its port and serves until ctrl-c
    Mapper {
        /// TOML listening configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a service node (airport control)
    Control {
        /// Name to register under
        id: String,

        /// Line sent back to every visitor
        info: String,

        /// Port of a registry to register with
        mapper: Option<String>,

        /// TOML listening configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Visit a route of service nodes (roc) and print what each replied
    Roc {
        /// Identity announced to every node
        id: String,

        /// Registry port, or `-` for none
        mapper: String,

        /// Node ports or registered names, visited in order
        destinations: Vec<String>,
    },
}
