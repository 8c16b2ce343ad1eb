use super::table::RegistryEntry;
use crate::protocol::messages::{parse_listing_line, parse_query_reply};
use crate::protocol::RegistryCommand;
use crate::transport::{connect, EndpointError, LineStream, StreamError};
use flightmap_common::protocol::NOT_FOUND;
use flightmap_common::Address;
use std::net::IpAddr;

/// Client side of the registry protocol
pub struct RegistryClient {
    stream: LineStream,
}

impl RegistryClient {
    pub async fn connect(host: IpAddr, registry: &Address) -> Result<Self, RegistryClientError> {
        let stream = connect(host, registry.port()).await?;
        Ok(Self { stream })
    }

    /// Ask the registry to map `name` to `address`
    ///
    /// The protocol has no acknowledgement for adds; use [`Self::query`] on
    /// the same connection to learn which mapping is in effect.
    pub async fn add(&mut self, name: &str, address: &Address) -> Result<(), RegistryClientError> {
        let command = RegistryCommand::Add {
            name: name.to_string(),
            address: address.clone(),
        };
        self.stream.write_line(&command.encode()).await?;
        Ok(())
    }

    /// Resolve `name`; `Ok(None)` is the registry's "no mapping" reply
    pub async fn query(&mut self, name: &str) -> Result<Option<Address>, RegistryClientError> {
        let command = RegistryCommand::Query(name.to_string());
        self.stream.write_line(&command.encode()).await?;

        let reply = self
            .stream
            .read_line()
            .await?
            .ok_or(RegistryClientError::NoReply)?;

        match parse_query_reply(&reply) {
            Some(address) => Ok(Some(address)),
            None if reply == NOT_FOUND => Ok(None),
            None => Err(RegistryClientError::MalformedReply(reply)),
        }
    }

    /// Fetch the full listing
    ///
    /// A listing has no terminator, so this closes the write side and reads
    /// until the registry ends the session.
    pub async fn list(mut self) -> Result<Vec<RegistryEntry>, RegistryClientError> {
        self.stream.write_line(&RegistryCommand::List.encode()).await?;
        self.stream.finish().await?;

        let mut entries = Vec::new();
        while let Some(line) = self.stream.read_line().await? {
            let (name, address) = parse_listing_line(&line)
                .ok_or_else(|| RegistryClientError::MalformedReply(line.clone()))?;
            entries.push(RegistryEntry::new(name, address));
        }

        Ok(entries)
    }
}

/// Registry client errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryClientError {
    #[error(transparent)]
    Connect(#[from] EndpointError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Registry closed the connection without replying")]
    NoReply,

    #[error("Malformed registry reply: {0:?}")]
    MalformedReply(String),
}
