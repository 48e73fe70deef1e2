//! # sdcp-protocol
//!
//! Wire protocol implementation for SDCP (Simple Display Control Protocol),
//! the binary command protocol spoken by Sony projectors over TCP.
//!
//! This crate provides:
//! - Request framing and response slicing
//! - Structural validation of responses against the request that caused them
//! - The device error table
//! - The catalog of addressable projector items and their value codecs
//! - Per-model item availability and named setting values
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod frame;
pub mod item;
pub mod model;
pub mod validate;
pub mod value;

pub use error::{DeviceError, ProtocolError};
pub use frame::{CommandKind, Community, RequestFrame, ResponseFields, HEADER};
pub use item::Item;
pub use model::Model;
pub use validate::validate_response;
pub use value::{PowerStatus, Switch};

/// Default TCP port of the SDCP service.
pub const DEFAULT_PORT: u16 = 53484;

/// Smallest well-formed response: header, community, status, item, length.
pub const MIN_FRAME_SIZE: usize = 10;

/// Largest response the device ever sends.
pub const MAX_FRAME_SIZE: usize = 34;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - MIN_FRAME_SIZE;

/// Status byte of a successful response.
pub const STATUS_OK: u8 = 0x01;

/// Returned in place of a payload when a successful response carries no data.
pub const NO_DATA: u8 = 0xFF;
