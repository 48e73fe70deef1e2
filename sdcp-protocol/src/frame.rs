//! Binary frame format for SDCP.
//!
//! Request layout:
//!
//! ```text
//! +--------+-----------+------+-----------+--------+---------+
//! | header | community | kind | item code | length | payload |
//! | 2 bytes|  4 bytes  |1 byte|  2 bytes  | 1 byte | length  |
//! +--------+-----------+------+-----------+--------+---------+
//! ```
//!
//! Responses share the layout, with a status byte in place of the kind.

use crate::error::ProtocolError;
use crate::item::Item;
use crate::{MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::str::FromStr;

/// Fixed header opening every frame.
pub const HEADER: [u8; 2] = [0x02, 0x0A];

/// Community the projector ships with.
pub const DEFAULT_COMMUNITY: Community = Community(*b"SONY");

/// Four-byte ASCII access tag, echoed back by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Community([u8; 4]);

impl Community {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Default for Community {
    fn default() -> Self {
        DEFAULT_COMMUNITY
    }
}

impl FromStr for Community {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| ProtocolError::InvalidCommunity(s.to_string()))?;
        if !bytes.is_ascii() {
            return Err(ProtocolError::InvalidCommunity(s.to_string()));
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Construction guarantees ASCII.
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Request kind byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandKind {
    /// Change a setting (or send an IR code).
    Set = 0x00,
    /// Read a setting.
    Get = 0x01,
}

/// A request ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    pub community: Community,
    pub kind: CommandKind,
    pub item: [u8; 2],
    /// Sent only for [`CommandKind::Set`]; at most [`MAX_PAYLOAD_SIZE`] bytes.
    pub payload: Bytes,
}

impl RequestFrame {
    /// Creates a request, rejecting set payloads that cannot fit a frame.
    /// A get never sends its payload, so any size is accepted.
    pub fn new(
        community: Community,
        kind: CommandKind,
        item: &Item,
        payload: impl Into<Bytes>,
    ) -> Result<Self, ProtocolError> {
        let payload = payload.into();
        if kind == CommandKind::Set && payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self {
            community,
            kind,
            item: item.code,
            payload,
        })
    }

    /// Declared length byte: payload length for a set, zero for a get.
    pub fn declared_len(&self) -> u8 {
        match self.kind {
            CommandKind::Set => self.payload.len() as u8,
            CommandKind::Get => 0,
        }
    }

    /// Encodes the frame into bytes.
    pub fn encode(&self) -> BytesMut {
        let declared = self.declared_len();
        let mut buf = BytesMut::with_capacity(MIN_FRAME_SIZE + declared as usize);

        buf.put_slice(&HEADER);
        buf.put_slice(self.community.as_bytes());
        buf.put_u8(self.kind as u8);
        buf.put_slice(&self.item);
        buf.put_u8(declared);
        if self.kind == CommandKind::Set {
            buf.put_slice(&self.payload);
        }

        buf
    }
}

/// Field view over a raw response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFields<'a> {
    pub header: [u8; 2],
    pub community: [u8; 4],
    pub status: u8,
    pub item: [u8; 2],
    pub declared_len: u8,
    /// Bytes after the fixed part, at most `declared_len` of them.
    pub payload: &'a [u8],
}

impl<'a> ResponseFields<'a> {
    /// Slices a response into its fields.
    ///
    /// `bytes` must hold at least [`MIN_FRAME_SIZE`] bytes; check before
    /// calling.
    pub fn slice(bytes: &'a [u8]) -> Self {
        debug_assert!(bytes.len() >= MIN_FRAME_SIZE);

        let declared_len = bytes[9];
        let end = (MIN_FRAME_SIZE + declared_len as usize).min(bytes.len());

        Self {
            header: [bytes[0], bytes[1]],
            community: [bytes[2], bytes[3], bytes[4], bytes[5]],
            status: bytes[6],
            item: [bytes[7], bytes[8]],
            declared_len,
            payload: &bytes[MIN_FRAME_SIZE..end],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_get() {
        let frame =
            RequestFrame::new(DEFAULT_COMMUNITY, CommandKind::Get, &Item::INPUT, vec![0u8, 0])
                .unwrap();
        assert_eq!(
            frame.encode().as_ref(),
            &[0x02, 0x0A, b'S', b'O', b'N', b'Y', 0x01, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn test_encode_set() {
        let frame = RequestFrame::new(
            DEFAULT_COMMUNITY,
            CommandKind::Set,
            &Item::CONTRAST,
            vec![0x00u8, 0x32],
        )
        .unwrap();
        assert_eq!(
            frame.encode().as_ref(),
            &[0x02, 0x0A, b'S', b'O', b'N', b'Y', 0x00, 0x00, 0x10, 0x02, 0x00, 0x32]
        );
    }

    #[test]
    fn test_payload_too_large() {
        let result = RequestFrame::new(
            DEFAULT_COMMUNITY,
            CommandKind::Set,
            &Item::POWER,
            vec![0u8; MAX_PAYLOAD_SIZE + 1],
        );
        assert!(matches!(
            result,
            Err(ProtocolError::PayloadTooLarge { size: 25, max: 24 })
        ));
    }

    #[test]
    fn test_get_ignores_payload_size() {
        let frame = RequestFrame::new(
            DEFAULT_COMMUNITY,
            CommandKind::Get,
            &Item::INPUT,
            vec![0u8; 30],
        )
        .unwrap();
        assert_eq!(frame.declared_len(), 0);
        assert_eq!(frame.encode().len(), MIN_FRAME_SIZE);
    }

    #[test]
    fn test_community_parse() {
        let community: Community = "ABCD".parse().unwrap();
        assert_eq!(community.as_bytes(), b"ABCD");
        assert_eq!(community.to_string(), "ABCD");

        assert!("ABC".parse::<Community>().is_err());
        assert!("ABCDE".parse::<Community>().is_err());
        assert!("ABÇ".parse::<Community>().is_err());
    }

    #[test]
    fn test_slice_clamps_payload_to_received() {
        // Declares 4 payload bytes, only 2 arrived
        let bytes = [0x02, 0x0A, b'S', b'O', b'N', b'Y', 0x01, 0x00, 0x01, 0x04, 0xAA, 0xBB];
        let fields = ResponseFields::slice(&bytes);
        assert_eq!(fields.declared_len, 4);
        assert_eq!(fields.payload, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_slice_ignores_trailing_bytes() {
        let mut bytes = vec![0x02, 0x0A, b'S', b'O', b'N', b'Y', 0x01, 0x00, 0x01, 0x01, 0x07];
        bytes.resize(crate::MAX_FRAME_SIZE, 0);
        let fields = ResponseFields::slice(&bytes);
        assert_eq!(fields.payload, &[0x07]);
    }

    proptest! {
        #[test]
        fn prop_set_frame_slices_back(
            item in prop::sample::select(Item::ALL.to_vec()),
            payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
        ) {
            let frame = RequestFrame::new(DEFAULT_COMMUNITY, CommandKind::Set, &item, payload.clone())
                .unwrap();
            let encoded = frame.encode();
            let fields = ResponseFields::slice(&encoded);

            prop_assert_eq!(fields.header, HEADER);
            prop_assert_eq!(&fields.community, DEFAULT_COMMUNITY.as_bytes());
            prop_assert_eq!(fields.status, CommandKind::Set as u8);
            prop_assert_eq!(fields.item, item.code);
            prop_assert_eq!(fields.declared_len as usize, payload.len());
            prop_assert_eq!(fields.payload, payload.as_slice());
        }

        #[test]
        fn prop_get_frame_carries_no_payload(
            item in prop::sample::select(Item::ALL.to_vec()),
            payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
        ) {
            let frame = RequestFrame::new(DEFAULT_COMMUNITY, CommandKind::Get, &item, payload)
                .unwrap();
            let encoded = frame.encode();
            prop_assert_eq!(encoded.len(), MIN_FRAME_SIZE);

            let fields = ResponseFields::slice(&encoded);
            prop_assert_eq!(fields.item, item.code);
            prop_assert_eq!(fields.declared_len, 0);
            prop_assert!(fields.payload.is_empty());
        }
    }
}
