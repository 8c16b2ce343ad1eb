use super::LineStream;
use flightmap_common::Port;
use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, TcpStream};

/// Listening TCP endpoint
pub struct Endpoint {
    inner: TcpListener,

    /// Local address, with the OS-chosen port filled in
    local_addr: SocketAddr,

    port: Port,
}

impl Endpoint {
    /// Bind to `bind_addr`; port 0 asks the OS for an ephemeral port
    pub async fn bind(bind_addr: SocketAddr) -> Result<Self, EndpointError> {
        let inner = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| EndpointError::BindFailed(format!("{}: {}", bind_addr, e)))?;

        let local_addr = inner.local_addr()?;
        let port = Port::new(local_addr.port())
            .map_err(|e| EndpointError::BindFailed(format!("{}: {}", local_addr, e)))?;

        Ok(Self {
            inner,
            local_addr,
            port,
        })
    }

    /// Accept the next incoming stream
    pub async fn accept(&self) -> Result<LineStream, EndpointError> {
        let (stream, peer) = self.inner.accept().await?;
        Ok(LineStream::new(stream, peer))
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The bound port, as printed for whoever launched this process
    pub fn port(&self) -> Port {
        self.port
    }
}

/// Open a stream to `port` on `host`
pub async fn connect(host: IpAddr, port: Port) -> Result<LineStream, EndpointError> {
    let addr = SocketAddr::new(host, port.get());
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| EndpointError::ConnectionFailed(format!("{}: {}", addr, e)))?;

    Ok(LineStream::new(stream, addr))
}

/// Endpoint errors
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Failed to bind to address: {0}")]
    BindFailed(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
