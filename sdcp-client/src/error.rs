//! Client error types.

use sdcp_protocol::{DeviceError, Item, ProtocolError};
use std::time::Duration;
use thiserror::Error;

/// Failures during a request/response exchange on an open connection.
#[derive(Debug, Error)]
pub enum CommunicationError {
    #[error("not connected")]
    NotConnected,

    #[error("no complete response after {elapsed:?} ({received} bytes received)")]
    Timeout { elapsed: Duration, received: usize },

    #[error("connection closed by peer after {received} bytes")]
    EndOfStream { received: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection to {addr} failed: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection to {addr} timed out after {timeout:?}")]
    ConnectTimeout { addr: String, timeout: Duration },

    #[error("communication error: {0}")]
    Communication(#[from] CommunicationError),

    #[error("item {0} is not available on this projector model")]
    Unavailable(Item),

    #[error("projector not ready for {command} (power status: {status})")]
    NotReady {
        command: &'static str,
        status: String,
    },

    #[error("invalid value for {item}: {}", hex::encode_upper(.data))]
    InvalidValue { item: Item, data: Vec<u8> },

    #[error("no {item} value named {name:?} on this projector model")]
    UnknownChoice { item: Item, name: String },
}

impl ClientError {
    /// Returns whether the socket could not be opened at all.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ClientError::Connection { .. } | ClientError::ConnectTimeout { .. }
        )
    }

    /// Returns the device error when the projector refused the request.
    pub fn device_error(&self) -> Option<DeviceError> {
        match self {
            ClientError::Communication(CommunicationError::Protocol(ProtocolError::Device(e))) => {
                Some(*e)
            }
            _ => None,
        }
    }

    pub fn is_device_error(&self) -> bool {
        self.device_error().is_some()
    }

    /// Returns whether the exchange itself broke (as opposed to the device
    /// answering with an error). The caller should consider the device
    /// offline and reopen the connection.
    pub fn is_link_failure(&self) -> bool {
        match self {
            ClientError::Connection { .. } | ClientError::ConnectTimeout { .. } => true,
            ClientError::Communication(e) => !matches!(
                e,
                CommunicationError::Protocol(ProtocolError::Device(_))
                    | CommunicationError::Protocol(ProtocolError::PayloadTooLarge { .. })
            ),
            _ => false,
        }
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        ClientError::Communication(CommunicationError::Protocol(err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Communication(CommunicationError::Io(err))
    }
}
