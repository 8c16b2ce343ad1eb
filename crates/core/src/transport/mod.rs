//! Line-oriented TCP transport
//!
//! Every role speaks one command or reply per `\n`-terminated line over a
//! plain loopback TCP stream.

mod endpoint;
mod stream;

pub use endpoint::{connect, Endpoint, EndpointError};
pub use stream::{LineStream, StreamError};
