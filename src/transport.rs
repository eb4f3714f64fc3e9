//! Byte transport seam.
//!
//! The engine only ever calls the non-blocking [`Transport`] methods. The
//! host build provides [`TcpTransport`] over a tokio socket; on the target
//! the link driver implements the trait.

use std::io;

use tokio::net::{TcpStream, lookup_host};
use tracing::{debug, info};

use crate::error::TransportError;

/// Non-blocking byte stream to the IRC server.
pub trait Transport {
    /// Whether the link is up.
    fn is_connected(&self) -> bool;

    /// Read whatever is available. `Ok(0)` means nothing right now.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Write as much as possible. `Ok(0)` means the link is busy.
    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError>;
}

/// TCP transport driven with `try_read`/`try_write`.
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Resolve `target` (`host:port`) and connect.
    pub async fn connect(target: &str) -> Result<Self, TransportError> {
        let addr = lookup_host(target)
            .await?
            .next()
            .ok_or_else(|| TransportError::Unresolved(target.to_string()))?;
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        info!(server = %target, peer = ?stream.peer_addr().ok(), "connected");
        Ok(Self {
            stream: Some(stream),
        })
    }

    /// Drop the socket.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("socket closed");
        }
    }

    fn fail(&mut self, err: TransportError) -> TransportError {
        self.stream = None;
        err
    }
}

impl Transport for TcpTransport {
    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let Some(stream) = &self.stream else {
            return Err(TransportError::Closed);
        };
        match stream.try_read(buf) {
            Ok(0) => Err(self.fail(TransportError::Closed)),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(0),
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        let Some(stream) = &self.stream else {
            return Err(TransportError::Closed);
        };
        match stream.try_write(bytes) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(0),
            Err(e) => Err(self.fail(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn tcp_transport_moves_bytes_both_ways() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(b"PING :x\r\n").await.unwrap();
            let mut buf = [0u8; 9];
            sock.read_exact(&mut buf).await.unwrap();
            buf
        });

        let mut transport = TcpTransport::connect(&addr).await.unwrap();
        assert!(transport.is_connected());

        let mut buf = [0u8; 64];
        let mut got = 0;
        while got < 9 {
            transport.stream.as_ref().unwrap().readable().await.unwrap();
            got += transport.recv(&mut buf[got..]).unwrap();
        }
        assert_eq!(&buf[..got], b"PING :x\r\n");

        let mut sent = 0;
        while sent < 9 {
            sent += transport.send(&b"PONG :x\r\n"[sent..]).unwrap();
        }
        assert_eq!(&server.await.unwrap(), b"PONG :x\r\n");

        transport.close();
        assert!(matches!(transport.recv(&mut buf), Err(TransportError::Closed)));
    }
}
