use super::log::VisitLog;
use crate::protocol::NodeCommand;
use crate::registry::RegistryClient;
use crate::shutdown::Shutdown;
use crate::transport::{Endpoint, EndpointError, LineStream, StreamError};
use flightmap_common::protocol::LOG_TERMINATOR;
use flightmap_common::{
    validate_field, validate_name, Address, FieldError, FlightmapError, Port, Result,
    ServerConfig,
};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Who a node is and what it tells visitors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    id: String,
    info: String,
}

impl NodeIdentity {
    /// The id must be a name the registry accepts; the info only has to
    /// stay on one line and avoid `:`
    pub fn new(id: impl Into<String>, info: impl Into<String>) -> std::result::Result<Self, FieldError> {
        let id = id.into();
        let info = info.into();
        validate_name(&id)?;
        validate_field(&info)?;
        Ok(Self { id, info })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn info(&self) -> &str {
        &self.info
    }
}

/// How the registry responded to a node registering itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered,
    /// Another node registered this id first; its mapping stays
    NameTaken(Address),
    /// The registry answered but holds no mapping for this id
    Unrecorded,
}

/// A service node: answers visits with its info and records each visitor
pub struct ServiceNode {
    endpoint: Endpoint,
    identity: Arc<NodeIdentity>,
    log: Arc<Mutex<VisitLog>>,
    shutdown: Shutdown,
}

impl ServiceNode {
    pub async fn bind(
        config: &ServerConfig,
        identity: NodeIdentity,
        shutdown: Shutdown,
    ) -> std::result::Result<Self, EndpointError> {
        let endpoint = Endpoint::bind(config.listen_addr()).await?;
        info!("Node {} bound to {}", identity.id(), endpoint.local_addr());

        Ok(Self {
            endpoint,
            identity: Arc::new(identity),
            log: Arc::new(Mutex::new(VisitLog::new())),
            shutdown,
        })
    }

    pub fn port(&self) -> Port {
        self.endpoint.port()
    }

    pub fn address(&self) -> Address {
        Address::from(self.port())
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// Report `id:port` to the registry
    ///
    /// The add is followed by a query on the same connection so the caller
    /// knows the mapping is in place before serving.
    pub async fn register(&self, host: IpAddr, registry: &Address) -> Result<Registration> {
        let mut client = RegistryClient::connect(host, registry)
            .await
            .map_err(|e| FlightmapError::registry_unavailable(e.to_string()))?;

        let address = self.address();
        client
            .add(self.identity.id(), &address)
            .await
            .map_err(|e| FlightmapError::registry_unavailable(e.to_string()))?;

        let mapped = client
            .query(self.identity.id())
            .await
            .map_err(|e| FlightmapError::registry_unavailable(e.to_string()))?;

        match mapped {
            Some(mapped) if mapped.port() == address.port() => {
                info!("Registered {} as {}", self.identity.id(), address);
                Ok(Registration::Registered)
            }
            Some(mapped) => {
                warn!(
                    "{} is already registered at {}",
                    self.identity.id(),
                    mapped
                );
                Ok(Registration::NameTaken(mapped))
            }
            None => {
                warn!("Registry did not record {}", self.identity.id());
                Ok(Registration::Unrecorded)
            }
        }
    }

    /// Serve until shutdown is triggered or accepting fails
    pub async fn run(self) -> std::result::Result<(), EndpointError> {
        let Self {
            endpoint,
            identity,
            log,
            mut shutdown,
        } = self;

        loop {
            let stream = tokio::select! {
                _ = shutdown.wait() => {
                    info!("Node {} shutting down", identity.id());
                    return Ok(());
                }
                accepted = endpoint.accept() => match accepted {
                    Ok(stream) => stream,
                    Err(e) => {
                        error!("Node {} accept loop failed: {}", identity.id(), e);
                        return Err(e);
                    }
                },
            };

            debug!("Node {}: new session from {}", identity.id(), stream.peer_addr());
            let identity = identity.clone();
            let log = log.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                let peer = stream.peer_addr();
                if let Err(e) = handle_session(stream, identity, log, shutdown).await {
                    debug!("Node session {} ended: {}", peer, e);
                }
            });
        }
    }
}

async fn handle_session(
    mut stream: LineStream,
    identity: Arc<NodeIdentity>,
    log: Arc<Mutex<VisitLog>>,
    mut shutdown: Shutdown,
) -> std::result::Result<(), StreamError> {
    loop {
        let line = tokio::select! {
            _ = shutdown.wait() => return Ok(()),
            line = stream.read_line() => line?,
        };
        let Some(line) = line else {
            return Ok(());
        };

        let reply = {
            let mut log = log.lock().await;
            respond(&mut log, &identity, NodeCommand::parse(&line))
        };

        stream.write_lines(&reply).await?;
    }
}

/// Apply one command to the visit log and build the reply lines
pub(crate) fn respond(log: &mut VisitLog, identity: &NodeIdentity, command: NodeCommand) -> Vec<String> {
    match command {
        NodeCommand::Log => {
            let mut lines = log.sorted_ids();
            lines.push(LOG_TERMINATOR.to_string());
            lines
        }
        NodeCommand::Visit(client_id) => {
            debug!("Node {}: visit from {:?}", identity.id(), client_id);
            log.record(client_id);
            vec![identity.info().to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> NodeIdentity {
        NodeIdentity::new("BNE", "Brisbane").unwrap()
    }

    fn run(log: &mut VisitLog, line: &str) -> Vec<String> {
        respond(log, &identity(), NodeCommand::parse(line))
    }

    #[test]
    fn test_visit_returns_info_and_records() {
        let mut log = VisitLog::new();

        assert_eq!(run(&mut log, "QF1"), ["Brisbane"]);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_log_is_sorted_and_terminated() {
        let mut log = VisitLog::new();

        run(&mut log, "VA9");
        run(&mut log, "QF1");
        run(&mut log, "VA9");
        assert_eq!(run(&mut log, "log"), ["QF1", "VA9", "VA9", "."]);
    }

    #[test]
    fn test_log_does_not_record_a_visit() {
        let mut log = VisitLog::new();

        assert_eq!(run(&mut log, "log"), ["."]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_identity_rejects_separator() {
        assert!(NodeIdentity::new("B:NE", "Brisbane").is_err());
        assert!(NodeIdentity::new("BNE", "Bris\nbane").is_err());
    }

    #[test]
    fn test_identity_rejects_ids_the_registry_would_drop() {
        assert_eq!(NodeIdentity::new("", "Brisbane"), Err(FieldError::Empty));
        assert!(matches!(
            NodeIdentity::new("A\tB", "Brisbane"),
            Err(FieldError::IllegalCharacter { found: '\t', .. })
        ));
        // info only travels as a reply line
        assert!(NodeIdentity::new("BNE", "").is_ok());
        assert!(NodeIdentity::new("BNE", "Bris\tbane").is_ok());
    }
}
