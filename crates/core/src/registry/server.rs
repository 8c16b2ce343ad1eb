use super::table::{AddOutcome, RegistryTable};
use crate::protocol::messages::{listing_line, query_reply};
use crate::protocol::RegistryCommand;
use crate::shutdown::Shutdown;
use crate::transport::{Endpoint, EndpointError, LineStream, StreamError};
use flightmap_common::{Port, ServerConfig};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Name registry server
///
/// Each accepted connection gets its own task. The table sits behind one
/// mutex that is taken after a command line has been read and released
/// before the reply is written, so a stalled peer never holds it.
pub struct RegistryServer {
    endpoint: Endpoint,
    table: Arc<Mutex<RegistryTable>>,
    shutdown: Shutdown,
}

impl RegistryServer {
    pub async fn bind(config: &ServerConfig, shutdown: Shutdown) -> Result<Self, EndpointError> {
        let endpoint = Endpoint::bind(config.listen_addr()).await?;
        info!("Registry bound to {}", endpoint.local_addr());

        Ok(Self {
            endpoint,
            table: Arc::new(Mutex::new(RegistryTable::new())),
            shutdown,
        })
    }

    pub fn port(&self) -> Port {
        self.endpoint.port()
    }

    /// Serve until shutdown is triggered or accepting fails
    pub async fn run(self) -> Result<(), EndpointError> {
        let Self {
            endpoint,
            table,
            mut shutdown,
        } = self;

        loop {
            let stream = tokio::select! {
                _ = shutdown.wait() => {
                    info!("Registry shutting down");
                    return Ok(());
                }
                accepted = endpoint.accept() => match accepted {
                    Ok(stream) => stream,
                    Err(e) => {
                        error!("Registry accept loop failed: {}", e);
                        return Err(e);
                    }
                },
            };

            debug!("Registry: new session from {}", stream.peer_addr());
            let table = table.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                let peer = stream.peer_addr();
                if let Err(e) = handle_session(stream, table, shutdown).await {
                    debug!("Registry session {} ended: {}", peer, e);
                }
            });
        }
    }
}

async fn handle_session(
    mut stream: LineStream,
    table: Arc<Mutex<RegistryTable>>,
    mut shutdown: Shutdown,
) -> Result<(), StreamError> {
    loop {
        let line = tokio::select! {
            _ = shutdown.wait() => return Ok(()),
            line = stream.read_line() => line?,
        };
        let Some(line) = line else {
            return Ok(());
        };

        let command = RegistryCommand::parse(&line);
        let reply = {
            let mut table = table.lock().await;
            respond(&mut table, command)
        };

        if !reply.is_empty() {
            stream.write_lines(&reply).await?;
        }
    }
}

/// Apply one command to the table and build the reply lines
pub(crate) fn respond(table: &mut RegistryTable, command: RegistryCommand) -> Vec<String> {
    match command {
        RegistryCommand::List => table
            .sorted_entries()
            .iter()
            .map(|entry| listing_line(&entry.name, &entry.address))
            .collect(),
        RegistryCommand::Query(name) => vec![query_reply(table.lookup(&name).ok())],
        RegistryCommand::Add { name, address } => {
            match table.add(&name, address) {
                AddOutcome::Inserted => info!("Registered {}", name),
                AddOutcome::AlreadyPresent => debug!("Ignoring duplicate registration of {}", name),
            }
            Vec::new()
        }
        RegistryCommand::Unknown(raw) => {
            debug!("Ignoring unknown registry command {:?}", raw);
            Vec::new()
        }
    }
}
