//! # sdcp-client
//!
//! Client library for Sony SDCP projectors.
//!
//! This crate provides:
//! - Byte transports: TCP and an in-memory simulated projector
//! - Response accumulation with poll and deadline bounds
//! - A connector that serializes request/response exchanges
//! - A typed projector API on top of raw items
//! - YAML and environment configuration

pub mod accumulator;
pub mod config;
pub mod connector;
pub mod error;
pub mod projector;
pub mod transport;

pub use config::{Capabilities, Config, ConfigError, ConnectorConfig};
pub use connector::Connector;
pub use error::{ClientError, CommunicationError};
pub use projector::Projector;
pub use transport::{ConnectionState, SimulatedTransport, TcpTransport, Transport};
