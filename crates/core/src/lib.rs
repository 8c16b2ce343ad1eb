pub mod itinerary;
pub mod protocol;
pub mod registry;
pub mod service;
pub mod shutdown;
pub mod transport;

pub use protocol::*;

// Re-export role types
pub use itinerary::{FlightReport, Itinerary, ItineraryError, Slot, SlotOutcome};
pub use registry::{
    AddOutcome, LookupError, RegistryClient, RegistryClientError, RegistryEntry, RegistryServer,
    RegistryTable,
};
pub use service::{
    NodeClient, NodeClientError, NodeIdentity, Registration, ServiceNode, VisitLog, VisitRecord,
};
pub use shutdown::{Shutdown, ShutdownHandle};
pub use transport::{Endpoint, EndpointError, LineStream, StreamError};
