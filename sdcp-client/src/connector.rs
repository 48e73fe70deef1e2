//! Request/response orchestration.

use crate::accumulator::read_response;
use crate::config::ConnectorConfig;
use crate::error::ClientError;
use crate::transport::{ConnectionState, SimulatedTransport, TcpTransport, Transport};
use bytes::Bytes;
use sdcp_protocol::value::QUERY_DATA;
use sdcp_protocol::{validate_response, CommandKind, Community, Item, RequestFrame};
use std::time::Duration;
use tokio::sync::{watch, Mutex};

/// Minimum gap after an IR code before the projector accepts another frame.
const IR_SETTLE_TIME: Duration = Duration::from_millis(45);

/// Connection to one projector.
///
/// SDCP frames carry no transaction id, so at most one exchange may be on
/// the wire at a time: `open`, `close` and every request serialize on a
/// single lock. Dropping a request future mid-exchange leaves unread bytes
/// on the socket; close the connector before reusing it.
pub struct Connector {
    transport: Mutex<Box<dyn Transport>>,
    community: Community,
    poll_interval: Duration,
    response_timeout: Duration,
    state: watch::Sender<ConnectionState>,
}

impl Connector {
    /// Creates a connector over `transport` (not yet opened).
    pub fn new(transport: Box<dyn Transport>, config: &ConnectorConfig) -> Self {
        let (state, _) = watch::channel(transport.state());
        Self {
            transport: Mutex::new(transport),
            community: config.community(),
            poll_interval: config.poll_interval(),
            response_timeout: config.response_timeout(),
            state,
        }
    }

    /// Creates a connector talking to a real projector over TCP.
    pub fn tcp(config: &ConnectorConfig) -> Self {
        let transport = TcpTransport::new(config.addr(), config.connect_timeout());
        Self::new(Box::new(transport), config)
    }

    /// Creates a connector over a simulated projector.
    pub fn simulated(transport: SimulatedTransport, config: &ConnectorConfig) -> Self {
        Self::new(Box::new(transport), config)
    }

    /// Subscribes to connection state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Returns whether the connection is established.
    pub fn is_connected(&self) -> bool {
        *self.state.borrow() == ConnectionState::Connected
    }

    pub fn community(&self) -> Community {
        self.community
    }

    /// Opens the connection. Opening an open connector is a no-op.
    pub async fn open(&self) -> Result<(), ClientError> {
        let mut transport = self.transport.lock().await;
        self.open_locked(transport.as_mut()).await
    }

    /// Closes the connection. Always succeeds.
    pub async fn close(&self) {
        let mut transport = self.transport.lock().await;
        self.close_locked(transport.as_mut()).await;
    }

    /// Performs one request/response exchange on the open connection.
    ///
    /// The payload is only sent for [`CommandKind::Set`]. Returns the
    /// response payload, or `[NO_DATA]` when the device sent none. There is
    /// no retry: one call is one exchange.
    pub async fn request(
        &self,
        item: &Item,
        kind: CommandKind,
        payload: &[u8],
    ) -> Result<Bytes, ClientError> {
        let frame = RequestFrame::new(self.community, kind, item, payload.to_vec())?;
        let mut transport = self.transport.lock().await;
        self.exchange(transport.as_mut(), item, &frame).await
    }

    /// Like [`Connector::request`], but opens the connection when it is
    /// closed and closes it again afterwards. An open connection is used
    /// and left open.
    pub async fn execute(
        &self,
        item: &Item,
        kind: CommandKind,
        payload: &[u8],
    ) -> Result<Bytes, ClientError> {
        let frame = RequestFrame::new(self.community, kind, item, payload.to_vec())?;
        let mut transport = self.transport.lock().await;

        let running_session = transport.is_connected();
        self.open_locked(transport.as_mut()).await?;

        let result = self.exchange(transport.as_mut(), item, &frame).await;

        if !running_session {
            self.close_locked(transport.as_mut()).await;
        }
        result
    }

    /// Sends an infrared remote code. The projector does not answer these.
    ///
    /// Uses the same session rule as [`Connector::execute`].
    pub async fn send_ir(&self, item: &Item) -> Result<(), ClientError> {
        tracing::debug!("Send IR {}", item);
        let frame = RequestFrame::new(self.community, CommandKind::Set, item, QUERY_DATA.to_vec())?;
        let mut transport = self.transport.lock().await;

        let running_session = transport.is_connected();
        self.open_locked(transport.as_mut()).await?;

        let result = transport.write_all(&frame.encode()).await;
        if result.is_ok() {
            tokio::time::sleep(IR_SETTLE_TIME).await;
        }

        if !running_session {
            self.close_locked(transport.as_mut()).await;
        }
        result?;
        tracing::debug!("Send IR {} succeeded", item);
        Ok(())
    }

    async fn open_locked(&self, transport: &mut dyn Transport) -> Result<(), ClientError> {
        if transport.is_connected() {
            return Ok(());
        }
        self.state.send_replace(ConnectionState::Connecting);
        match transport.open().await {
            Ok(()) => {
                tracing::debug!("Connected to {}", transport.describe());
                self.state.send_replace(ConnectionState::Connected);
                Ok(())
            }
            Err(e) => {
                self.state.send_replace(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    async fn close_locked(&self, transport: &mut dyn Transport) {
        transport.close().await;
        self.state.send_replace(ConnectionState::Disconnected);
    }

    async fn exchange(
        &self,
        transport: &mut dyn Transport,
        item: &Item,
        frame: &RequestFrame,
    ) -> Result<Bytes, ClientError> {
        let encoded = frame.encode();
        tracing::debug!(
            "Request {} ({:?}): {}",
            item,
            frame.kind,
            hex::encode_upper(&encoded)
        );

        transport.write_all(&encoded).await?;

        let response = read_response(transport, self.poll_interval, self.response_timeout).await?;
        tracing::debug!("Response {}: {}", item, hex::encode_upper(&response));

        let payload = validate_response(&response, frame).map_err(|e| {
            tracing::debug!("Response to {} rejected: {}", item, e);
            e
        })?;
        Ok(payload)
    }
}
