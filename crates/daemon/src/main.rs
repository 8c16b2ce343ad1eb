//! flightmap - name registry, service nodes and itinerant clients
//!
//! One binary, three roles:
//! - `mapper` runs the name registry
//! - `control` runs a service node, optionally registering with a mapper
//! - `roc` visits a route of service nodes and prints their replies
//!
//! Servers print their bound port on stdout before serving; all logging goes
//! to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use flightmap_common::{Address, ClientConfig, Port, ServerConfig};
use flightmap_core::shutdown::{self, ShutdownHandle};
use flightmap_core::{Itinerary, NodeIdentity, Registration, RegistryServer, ServiceNode};
use flightmap_daemon::exit::USAGE;
use flightmap_daemon::{Cli, Command, ControlExit, ExitStatus, MapperExit, RocExit};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() { USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match cli.command {
        Command::Mapper { config } => {
            let config = match load_config(config.as_deref(), cli.verbose) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{:#}", e);
                    return ExitCode::from(USAGE);
                }
            };
            init_logging(config.verbose);
            run_mapper(config).await.exit()
        }
        Command::Control {
            id,
            info,
            mapper,
            config,
        } => {
            let config = match load_config(config.as_deref(), cli.verbose) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{:#}", e);
                    return ExitCode::from(USAGE);
                }
            };
            init_logging(config.verbose);
            run_control(id, info, mapper, config).await.exit()
        }
        Command::Roc {
            id,
            mapper,
            destinations,
        } => {
            let config = ClientConfig::default().with_verbose(cli.verbose);
            init_logging(config.verbose);
            run_roc(id, mapper, destinations, config).await.exit()
        }
    }
}

/// Run the registry until ctrl-c
async fn run_mapper(config: ServerConfig) -> MapperExit {
    let (handle, signal) = shutdown::channel();

    let server = match RegistryServer::bind(&config, signal).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start registry: {}", e);
            return MapperExit::Fatal;
        }
    };

    announce_port(server.port());
    shutdown_on_ctrl_c(handle);

    match server.run().await {
        Ok(()) => MapperExit::Normal,
        Err(_) => MapperExit::Fatal,
    }
}

/// Run a service node until ctrl-c
async fn run_control(
    id: String,
    info: String,
    mapper: Option<String>,
    config: ServerConfig,
) -> ControlExit {
    let identity = match NodeIdentity::new(id, info) {
        Ok(identity) => identity,
        Err(e) => {
            info!("Rejected node identity: {}", e);
            return ControlExit::InvalidField;
        }
    };

    let registry = match mapper.as_deref().map(str::parse::<Address>).transpose() {
        Ok(registry) => registry,
        Err(e) => {
            info!("Rejected mapper port: {}", e);
            return ControlExit::InvalidPort;
        }
    };

    let (handle, signal) = shutdown::channel();
    let node = match ServiceNode::bind(&config, identity, signal).await {
        Ok(node) => node,
        Err(e) => {
            error!("Failed to start node: {}", e);
            return ControlExit::ListenFailed;
        }
    };

    announce_port(node.port());

    if let Some(registry) = registry {
        match node.register(ClientConfig::default().host, &registry).await {
            Ok(Registration::Registered) => {}
            Ok(Registration::NameTaken(existing)) => {
                warn!(
                    "{} already maps to {}; serving unregistered",
                    node.identity().id(),
                    existing
                );
            }
            Ok(Registration::Unrecorded) => {
                warn!("Serving {} unregistered", node.identity().id());
            }
            Err(e) => {
                error!("Registration failed: {}", e);
                return ControlExit::RegistryUnreachable;
            }
        }
    }

    shutdown_on_ctrl_c(handle);

    match node.run().await {
        Ok(()) => ControlExit::Normal,
        Err(_) => ControlExit::ListenFailed,
    }
}

/// Visit every destination and print the replies
async fn run_roc(
    id: String,
    mapper: String,
    destinations: Vec<String>,
    config: ClientConfig,
) -> RocExit {
    let registry = if mapper == "-" {
        None
    } else {
        match mapper.parse::<Address>() {
            Ok(address) => Some(address),
            Err(e) => {
                info!("Rejected mapper port: {}", e);
                return RocExit::InvalidMapperPort;
            }
        }
    };

    let itinerary = Itinerary::from_raw(id, destinations);
    let report = match itinerary.fly(registry.as_ref(), &config).await {
        Ok(report) => report,
        Err(e) => {
            info!("Trip abandoned: {}", e);
            return RocExit::from(&e);
        }
    };

    let mut stdout = std::io::stdout().lock();
    for line in report.output_lines() {
        let _ = writeln!(stdout, "{}", line);
    }
    let _ = stdout.flush();

    match report.status() {
        Ok(()) => RocExit::Normal,
        Err(e) => {
            info!("Trip finished with failures: {}", e);
            RocExit::from(&e)
        }
    }
}

/// Errors at stderr by default, everything with `-v`
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::ERROR };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the listening configuration; `-v` on the command line wins over the file
fn load_config(path: Option<&Path>, verbose: bool) -> Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("Cannot load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };

    let verbose = config.verbose || verbose;
    Ok(config.with_verbose(verbose))
}

/// Print the bound port once for whoever launched us
fn announce_port(port: Port) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", port);
    let _ = stdout.flush();
}

fn shutdown_on_ctrl_c(handle: ShutdownHandle) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                handle.trigger();
            }
            Err(e) => warn!("Cannot listen for ctrl-c: {}", e),
        }
    });
}
