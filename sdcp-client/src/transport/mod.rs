//! Byte-level transport to a projector.
//!
//! The [`Transport`] trait is the only thing the accumulator and connector
//! know about the link. [`TcpTransport`] talks to a real projector;
//! [`SimulatedTransport`] fabricates replies so everything above it can be
//! exercised without hardware.

pub mod simulated;
pub mod tcp;

pub use simulated::{Journal, JournalEntry, SimulatedTransport};
pub use tcp::TcpTransport;

use crate::error::{ClientError, CommunicationError};
use async_trait::async_trait;
use std::time::Duration;

/// Result of one bounded read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// This many bytes were placed at the start of the buffer.
    Data(usize),
    /// The poll interval elapsed with nothing to read.
    WouldBlock,
    /// The peer closed the connection.
    Closed,
}

/// Connection state as seen by the owner of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[async_trait]
pub trait Transport: Send {
    /// Establishes the link. Opening an open transport is a no-op.
    async fn open(&mut self) -> Result<(), ClientError>;

    /// Releases the link. Always succeeds; close-time errors are dropped.
    async fn close(&mut self);

    /// Writes a whole frame and flushes it.
    async fn write_all(&mut self, frame: &[u8]) -> Result<(), CommunicationError>;

    /// Performs one read that waits at most `poll`.
    async fn read_chunk(
        &mut self,
        buf: &mut [u8],
        poll: Duration,
    ) -> Result<ReadOutcome, CommunicationError>;

    fn state(&self) -> ConnectionState;

    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Short description for logs.
    fn describe(&self) -> String;
}
