//! Itinerant client
//!
//! Resolves a route of names and addresses through the registry, then visits
//! each stop in order, one at a time. A failed stop is recorded and skipped;
//! it never cuts the trip short.

mod report;

pub use report::{FlightReport, ItineraryError, Slot, SlotOutcome};

use crate::registry::RegistryClient;
use crate::service::NodeClient;
use flightmap_common::{Address, ClientConfig, Destination};
use tracing::{debug, info, warn};

/// A client identity and the stops it will visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    client_id: String,
    destinations: Vec<Destination>,
}

/// A stop after resolution
enum Stop {
    Ready(Address),
    Unresolved(String),
}

impl Itinerary {
    pub fn new(client_id: impl Into<String>, destinations: Vec<Destination>) -> Self {
        Self {
            client_id: client_id.into(),
            destinations,
        }
    }

    /// Parse each raw destination as an address, or keep it as a name
    pub fn from_raw<I, S>(client_id: impl Into<String>, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let destinations = raw
            .into_iter()
            .map(|d| Destination::parse(d.as_ref()))
            .collect();
        Self::new(client_id, destinations)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Whether any stop is a name the registry has to resolve
    pub fn requires_registry(&self) -> bool {
        self.destinations.iter().any(Destination::needs_resolution)
    }

    /// Resolve names, then visit every stop in order
    ///
    /// Errors here are the fatal cases: a name needs resolving and there is
    /// no registry to ask. Everything else is recorded per stop in the
    /// report; see [`FlightReport::status`] for the overall verdict.
    pub async fn fly(
        &self,
        registry: Option<&Address>,
        config: &ClientConfig,
    ) -> Result<FlightReport, ItineraryError> {
        let stops = self.resolve(registry, config).await?;

        let mut slots = Vec::with_capacity(stops.len());
        for stop in stops {
            let slot = match stop {
                Stop::Unresolved(name) => Slot {
                    destination: Destination::Name(name),
                    outcome: SlotOutcome::Unresolved,
                },
                Stop::Ready(address) => {
                    let outcome = self.visit(&address, config).await;
                    Slot {
                        destination: Destination::Address(address),
                        outcome,
                    }
                }
            };
            slots.push(slot);
        }

        Ok(FlightReport::new(slots))
    }

    async fn resolve(
        &self,
        registry: Option<&Address>,
        config: &ClientConfig,
    ) -> Result<Vec<Stop>, ItineraryError> {
        if !self.requires_registry() {
            return Ok(self
                .destinations
                .iter()
                .map(|destination| match destination {
                    Destination::Address(address) => Stop::Ready(address.clone()),
                    Destination::Name(name) => Stop::Unresolved(name.clone()),
                })
                .collect());
        }

        let registry = registry.ok_or(ItineraryError::RegistryRequired)?;
        let mut client = RegistryClient::connect(config.host, registry)
            .await
            .map_err(|e| ItineraryError::RegistryUnreachable(e.to_string()))?;

        let mut stops = Vec::with_capacity(self.destinations.len());
        for destination in &self.destinations {
            let stop = match destination {
                Destination::Address(address) => Stop::Ready(address.clone()),
                Destination::Name(name) => match client.query(name).await {
                    Ok(Some(address)) => {
                        debug!("Resolved {} to {}", name, address);
                        Stop::Ready(address)
                    }
                    Ok(None) => {
                        warn!("No registry entry for {}", name);
                        Stop::Unresolved(name.clone())
                    }
                    Err(e) => {
                        warn!("Could not resolve {}: {}", name, e);
                        Stop::Unresolved(name.clone())
                    }
                },
            };
            stops.push(stop);
        }

        Ok(stops)
    }

    async fn visit(&self, address: &Address, config: &ClientConfig) -> SlotOutcome {
        let result = async {
            let mut node = NodeClient::connect(config.host, address).await?;
            node.visit(&self.client_id).await
        }
        .await;

        match result {
            Ok(info) => {
                info!("Visited {}", address);
                SlotOutcome::Visited(info)
            }
            Err(e) => {
                warn!("Failed to visit {}: {}", address, e);
                SlotOutcome::Unreachable(e.to_string())
            }
        }
    }
}
