//! Protocol error types and the device error table.

use std::fmt;
use thiserror::Error;

/// Framing and validation errors, plus errors reported by the device itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("response too short: {len} bytes")]
    ResponseTooShort { len: usize },

    #[error("unexpected header: {}", hex::encode_upper(.0))]
    BadHeader([u8; 2]),

    #[error(
        "community mismatch: expected {}, got {}",
        hex::encode_upper(.expected),
        hex::encode_upper(.actual)
    )]
    CommunityMismatch { expected: [u8; 4], actual: [u8; 4] },

    #[error(
        "item mismatch: expected {}, got {}",
        hex::encode_upper(.expected),
        hex::encode_upper(.actual)
    )]
    ItemMismatch { expected: [u8; 2], actual: [u8; 2] },

    #[error("declared payload length {declared} exceeds the {received} bytes received")]
    DeclaredLengthMismatch { declared: usize, received: usize },

    #[error("device error: {0}")]
    Device(DeviceError),

    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("invalid community {0:?}: must be 4 ASCII characters")]
    InvalidCommunity(String),
}

impl ProtocolError {
    /// Returns whether the device understood the frame and refused it.
    pub fn is_device_error(&self) -> bool {
        matches!(self, ProtocolError::Device(_))
    }
}

/// Errors the projector reports in a failed response.
///
/// The table is closed; codes without an entry resolve to
/// [`DeviceError::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceError {
    // Item errors
    InvalidItem,
    InvalidItemRequest,
    InvalidLength,
    InvalidData,
    ShortData,
    NotApplicableItem,

    // Community errors
    DifferentCommunity,

    // Request errors
    InvalidVersion,
    InvalidCategory,
    InvalidRequest,
    ShortHeader,
    ShortCommunity,
    ShortCommand,

    // Network errors
    NetworkTimeout,

    // Projector communication errors
    CommTimeout,
    CommChecksumError,
    CommFramingError,
    CommParityError,
    CommOverRunError,
    CommOtherError,
    CommUnknownResponse,

    // NVRAM errors
    NvramReadError,
    NvramWriteError,

    /// A code with no entry in the table.
    Unknown([u8; 2]),
}

impl DeviceError {
    /// Every known entry, in table order.
    pub const KNOWN: [DeviceError; 23] = [
        DeviceError::InvalidItem,
        DeviceError::InvalidItemRequest,
        DeviceError::InvalidLength,
        DeviceError::InvalidData,
        DeviceError::ShortData,
        DeviceError::NotApplicableItem,
        DeviceError::DifferentCommunity,
        DeviceError::InvalidVersion,
        DeviceError::InvalidCategory,
        DeviceError::InvalidRequest,
        DeviceError::ShortHeader,
        DeviceError::ShortCommunity,
        DeviceError::ShortCommand,
        DeviceError::NetworkTimeout,
        DeviceError::CommTimeout,
        DeviceError::CommChecksumError,
        DeviceError::CommFramingError,
        DeviceError::CommParityError,
        DeviceError::CommOverRunError,
        DeviceError::CommOtherError,
        DeviceError::CommUnknownResponse,
        DeviceError::NvramReadError,
        DeviceError::NvramWriteError,
    ];

    /// Looks up the entry for a two-byte device code.
    pub fn resolve(code: [u8; 2]) -> DeviceError {
        Self::KNOWN
            .into_iter()
            .find(|entry| entry.code() == code)
            .unwrap_or(DeviceError::Unknown(code))
    }

    /// The two-byte code the device sends for this error.
    pub fn code(&self) -> [u8; 2] {
        match self {
            DeviceError::InvalidItem => [0x01, 0x01],
            DeviceError::InvalidItemRequest => [0x01, 0x02],
            DeviceError::InvalidLength => [0x01, 0x03],
            DeviceError::InvalidData => [0x01, 0x04],
            DeviceError::ShortData => [0x01, 0x11],
            DeviceError::NotApplicableItem => [0x01, 0x80],
            DeviceError::DifferentCommunity => [0x02, 0x01],
            DeviceError::InvalidVersion => [0x10, 0x01],
            DeviceError::InvalidCategory => [0x10, 0x02],
            DeviceError::InvalidRequest => [0x10, 0x03],
            DeviceError::ShortHeader => [0x10, 0x11],
            DeviceError::ShortCommunity => [0x10, 0x12],
            DeviceError::ShortCommand => [0x10, 0x13],
            DeviceError::NetworkTimeout => [0x20, 0x01],
            DeviceError::CommTimeout => [0xF0, 0x01],
            DeviceError::CommChecksumError => [0xF0, 0x10],
            DeviceError::CommFramingError => [0xF0, 0x20],
            DeviceError::CommParityError => [0xF0, 0x30],
            DeviceError::CommOverRunError => [0xF0, 0x40],
            DeviceError::CommOtherError => [0xF0, 0x50],
            DeviceError::CommUnknownResponse => [0xF0, 0xF0],
            DeviceError::NvramReadError => [0xF1, 0x10],
            DeviceError::NvramWriteError => [0xF1, 0x20],
            DeviceError::Unknown(code) => *code,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> &'static str {
        match self {
            DeviceError::InvalidItem => "Invalid Item",
            DeviceError::InvalidItemRequest => "Invalid Item Request",
            DeviceError::InvalidLength => "Invalid Length",
            DeviceError::InvalidData => "Invalid Data",
            DeviceError::ShortData => "Short Data",
            DeviceError::NotApplicableItem => "Not Applicable Item",
            DeviceError::DifferentCommunity => "Different Community",
            DeviceError::InvalidVersion => "Invalid Version",
            DeviceError::InvalidCategory => "Invalid Category",
            DeviceError::InvalidRequest => "Invalid Request",
            DeviceError::ShortHeader => "Short Header",
            DeviceError::ShortCommunity => "Short Community",
            DeviceError::ShortCommand => "Short Command",
            DeviceError::NetworkTimeout => "Network Timeout",
            DeviceError::CommTimeout => "Communication Timeout",
            DeviceError::CommChecksumError => "Check Sum Error",
            DeviceError::CommFramingError => "Framing Error",
            DeviceError::CommParityError => "Parity Error",
            DeviceError::CommOverRunError => "Over Run Error",
            DeviceError::CommOtherError => "Other Comm Error",
            DeviceError::CommUnknownResponse => "Unknown Response",
            DeviceError::NvramReadError => "Read Error of NVRAM",
            DeviceError::NvramWriteError => "Write Error of NVRAM",
            DeviceError::Unknown(_) => "Unknown Device Error",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DeviceError::Unknown(_))
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), hex::encode_upper(self.code()))
    }
}
