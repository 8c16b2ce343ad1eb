use flightmap_common::protocol::MAX_LINE_LEN;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// A TCP stream framed as `\n`-terminated text lines
#[derive(Debug)]
pub struct LineStream {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    peer: SocketAddr,
}

impl LineStream {
    pub(crate) fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: BufWriter::new(write),
            peer,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Read one line without its trailing `\n`
    ///
    /// Returns `None` once the peer has closed its side. Only the newline is
    /// stripped, a `\r` before it stays part of the line. A final line with
    /// no newline before EOF is still returned. Lines must be UTF-8.
    pub async fn read_line(&mut self) -> Result<Option<String>, StreamError> {
        let mut buf = Vec::new();
        let limit = (MAX_LINE_LEN + 1) as u64;

        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| StreamError::Read(e.to_string()))?;

        if read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        } else if buf.len() > MAX_LINE_LEN {
            return Err(StreamError::LineTooLong(MAX_LINE_LEN));
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| StreamError::NotUtf8(e.utf8_error().valid_up_to()))
    }

    /// Write one line and flush it
    pub async fn write_line(&mut self, line: &str) -> Result<(), StreamError> {
        self.buffer_line(line).await?;
        self.flush().await
    }

    /// Write several lines with a single flush
    pub async fn write_lines<I, S>(&mut self, lines: I) -> Result<(), StreamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.buffer_line(line.as_ref()).await?;
        }
        self.flush().await
    }

    /// Close the write side; the peer sees EOF after any buffered lines
    pub async fn finish(&mut self) -> Result<(), StreamError> {
        self.writer
            .shutdown()
            .await
            .map_err(|e| StreamError::Finish(e.to_string()))
    }

    async fn buffer_line(&mut self, line: &str) -> Result<(), StreamError> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| StreamError::Write(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(|e| StreamError::Write(e.to_string()))
    }

    async fn flush(&mut self) -> Result<(), StreamError> {
        self.writer
            .flush()
            .await
            .map_err(|e| StreamError::Write(e.to_string()))
    }
}

/// Stream errors
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Write error: {0}")]
    Write(String),

    #[error("Read error: {0}")]
    Read(String),

    #[error("Finish error: {0}")]
    Finish(String),

    #[error("Line exceeds {0} bytes")]
    LineTooLong(usize),

    #[error("Line is not UTF-8 after byte {0}")]
    NotUtf8(usize),
}
