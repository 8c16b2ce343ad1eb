use crate::protocol::messages::is_log_terminator;
use crate::protocol::NodeCommand;
use crate::transport::{connect, EndpointError, LineStream, StreamError};
use flightmap_common::Address;
use std::net::IpAddr;

/// Client side of the service node protocol
pub struct NodeClient {
    stream: LineStream,
}

impl NodeClient {
    pub async fn connect(host: IpAddr, node: &Address) -> Result<Self, NodeClientError> {
        let stream = connect(host, node.port()).await?;
        Ok(Self { stream })
    }

    /// Announce `client_id` and return the node's info line
    pub async fn visit(&mut self, client_id: &str) -> Result<String, NodeClientError> {
        let command = NodeCommand::Visit(client_id.to_string());
        self.stream.write_line(&command.encode()).await?;

        self.stream
            .read_line()
            .await?
            .ok_or(NodeClientError::NoReply)
    }

    /// Every visitor the node has recorded, ascending
    pub async fn log(&mut self) -> Result<Vec<String>, NodeClientError> {
        self.stream.write_line(&NodeCommand::Log.encode()).await?;

        let mut visitors = Vec::new();
        loop {
            match self.stream.read_line().await? {
                Some(line) if is_log_terminator(&line) => return Ok(visitors),
                Some(line) => visitors.push(line),
                None => return Err(NodeClientError::Truncated(visitors.len())),
            }
        }
    }
}

/// Service node client errors
#[derive(Debug, thiserror::Error)]
pub enum NodeClientError {
    #[error(transparent)]
    Connect(#[from] EndpointError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Node closed the connection without replying")]
    NoReply,

    #[error("Node closed the connection after {0} log lines, before the terminator")]
    Truncated(usize),
}
