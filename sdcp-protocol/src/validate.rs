//! Response validation.
//!
//! SDCP carries no transaction id: a response is matched to its request
//! only by the community and item echo, so those checks are what keeps
//! request/response correlation honest.

use crate::error::{DeviceError, ProtocolError};
use crate::frame::{RequestFrame, ResponseFields, HEADER};
use crate::{MIN_FRAME_SIZE, NO_DATA, STATUS_OK};
use bytes::Bytes;

/// Validates `bytes` as the response to `request` and extracts its payload.
///
/// Checks run in order and stop at the first failure: length, header,
/// community echo, item echo, declared length, status. A successful
/// response without payload yields `[NO_DATA]`.
pub fn validate_response(bytes: &[u8], request: &RequestFrame) -> Result<Bytes, ProtocolError> {
    if bytes.len() < MIN_FRAME_SIZE {
        return Err(ProtocolError::ResponseTooShort { len: bytes.len() });
    }

    let fields = ResponseFields::slice(bytes);

    if fields.header != HEADER {
        return Err(ProtocolError::BadHeader(fields.header));
    }

    if &fields.community != request.community.as_bytes() {
        return Err(ProtocolError::CommunityMismatch {
            expected: *request.community.as_bytes(),
            actual: fields.community,
        });
    }

    if fields.item != request.item {
        return Err(ProtocolError::ItemMismatch {
            expected: request.item,
            actual: fields.item,
        });
    }

    let declared = fields.declared_len as usize;
    if MIN_FRAME_SIZE + declared > bytes.len() {
        return Err(ProtocolError::DeclaredLengthMismatch {
            declared,
            received: bytes.len() - MIN_FRAME_SIZE,
        });
    }

    if fields.status != STATUS_OK {
        return Err(ProtocolError::Device(device_error(fields.payload)));
    }

    if fields.payload.is_empty() {
        Ok(Bytes::from_static(&[NO_DATA]))
    } else {
        Ok(Bytes::copy_from_slice(fields.payload))
    }
}

/// The error code sits in the first two payload bytes of a failed response.
fn device_error(payload: &[u8]) -> DeviceError {
    match payload {
        [hi, lo, ..] => DeviceError::resolve([*hi, *lo]),
        _ => DeviceError::Unknown([0x00, 0x00]),
    }
}
