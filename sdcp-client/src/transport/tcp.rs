//! TCP transport.

use super::{ConnectionState, ReadOutcome, Transport};
use crate::error::{ClientError, CommunicationError};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Transport over a plain TCP socket.
pub struct TcpTransport {
    addr: String,
    connect_timeout: Duration,
    stream: Option<TcpStream>,
    state: ConnectionState,
}

impl TcpTransport {
    /// Creates a transport for `addr` (`host:port`), not yet connected.
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
            stream: None,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn open(&mut self) -> Result<(), ClientError> {
        if self.stream.is_some() {
            return Ok(());
        }

        tracing::debug!("Connecting to {}...", self.addr);
        self.state = ConnectionState::Connecting;

        let result =
            tokio::time::timeout(self.connect_timeout, TcpStream::connect(self.addr.as_str()))
                .await;

        let stream = match result {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                tracing::debug!("Connection to {} failed: {}", self.addr, e);
                self.state = ConnectionState::Disconnected;
                return Err(ClientError::Connection {
                    addr: self.addr.clone(),
                    source: e,
                });
            }
            Err(_) => {
                tracing::debug!("Connection to {} timed out", self.addr);
                self.state = ConnectionState::Disconnected;
                return Err(ClientError::ConnectTimeout {
                    addr: self.addr.clone(),
                    timeout: self.connect_timeout,
                });
            }
        };

        // Frames are tiny; don't let Nagle hold them back
        stream.set_nodelay(true).ok();

        self.stream = Some(stream);
        self.state = ConnectionState::Connected;
        tracing::debug!("Connected to {}", self.addr);
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!("Closing connection to {}", self.addr);
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Ignoring error on close: {}", e);
            }
        }
        self.state = ConnectionState::Disconnected;
    }

    async fn write_all(&mut self, frame: &[u8]) -> Result<(), CommunicationError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or(CommunicationError::NotConnected)?;

        stream.write_all(frame).await.map_err(|e| {
            tracing::debug!("Write to {} failed: {}", self.addr, e);
            CommunicationError::Io(e)
        })?;
        stream.flush().await?;
        Ok(())
    }

    async fn read_chunk(
        &mut self,
        buf: &mut [u8],
        poll: Duration,
    ) -> Result<ReadOutcome, CommunicationError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or(CommunicationError::NotConnected)?;

        match tokio::time::timeout(poll, stream.read(buf)).await {
            Err(_) => Ok(ReadOutcome::WouldBlock),
            Ok(Ok(0)) => Ok(ReadOutcome::Closed),
            Ok(Ok(n)) => Ok(ReadOutcome::Data(n)),
            Ok(Err(e)) => {
                tracing::debug!("Read from {} failed: {}", self.addr, e);
                Err(CommunicationError::Io(e))
            }
        }
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_open_refused() {
        // Grab a free port, then release it so nothing listens there
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut transport = TcpTransport::new(addr.to_string(), Duration::from_secs(2));
        let err = transport.open().await.unwrap_err();
        assert!(err.is_connection_error());
        assert_eq!(transport.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_read_write_and_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4];
            socket.read_exact(&mut buf).await.unwrap();
            socket.write_all(&buf).await.unwrap();
            // Hang up after echoing
        });

        let mut transport = TcpTransport::new(addr.to_string(), Duration::from_secs(2));
        transport.open().await.unwrap();
        assert!(transport.is_connected());

        transport.write_all(b"ping").await.unwrap();

        let mut buf = [0u8; 34];
        let mut received = Vec::new();
        loop {
            match transport
                .read_chunk(&mut buf, Duration::from_millis(500))
                .await
                .unwrap()
            {
                ReadOutcome::Data(n) => received.extend_from_slice(&buf[..n]),
                ReadOutcome::WouldBlock => continue,
                ReadOutcome::Closed => break,
            }
        }
        assert_eq!(received, b"ping");

        server.await.unwrap();
        transport.close().await;
        transport.close().await;
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_read_times_out_without_data() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
            drop(socket);
        });

        let mut transport = TcpTransport::new(addr.to_string(), Duration::from_secs(2));
        transport.open().await.unwrap();

        let mut buf = [0u8; 34];
        let outcome = transport
            .read_chunk(&mut buf, Duration::from_millis(20))
            .await
            .unwrap();
        assert_eq!(outcome, ReadOutcome::WouldBlock);

        transport.close().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_io_requires_open() {
        let mut transport = TcpTransport::new("127.0.0.1:1", Duration::from_secs(1));
        let err = transport.write_all(b"x").await.unwrap_err();
        assert!(matches!(err, CommunicationError::NotConnected));

        let mut buf = [0u8; 4];
        let err = transport
            .read_chunk(&mut buf, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, CommunicationError::NotConnected));
    }
}
