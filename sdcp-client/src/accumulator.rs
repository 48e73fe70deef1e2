//! Response accumulation.
//!
//! A response may arrive in several pieces. Reads are bounded twice: each
//! poll by the poll interval, the whole response by a wall-clock deadline.

use crate::error::CommunicationError;
use crate::transport::{ReadOutcome, Transport};
use sdcp_protocol::{MAX_FRAME_SIZE, MIN_FRAME_SIZE};
use std::time::Duration;
use tokio::time::Instant;

/// Reads one response from `transport`.
///
/// Returns as soon as the frame is complete (the fixed part plus the
/// declared payload, capped at [`MAX_FRAME_SIZE`]). If the deadline passes
/// or the peer closes after the fixed part arrived, returns what was
/// collected and leaves the length check to validation; before that point
/// both are errors.
pub async fn read_response<T>(
    transport: &mut T,
    poll: Duration,
    timeout: Duration,
) -> Result<Vec<u8>, CommunicationError>
where
    T: Transport + ?Sized,
{
    let start = Instant::now();
    let deadline = start + timeout;
    let mut collected = Vec::with_capacity(MAX_FRAME_SIZE);
    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let wanted = expected_len(&collected);
        if collected.len() >= wanted {
            break;
        }

        let now = Instant::now();
        if now >= deadline {
            if collected.len() >= MIN_FRAME_SIZE {
                tracing::debug!(
                    "Response incomplete at deadline: {} of {} bytes",
                    collected.len(),
                    wanted
                );
                break;
            }
            return Err(CommunicationError::Timeout {
                elapsed: now - start,
                received: collected.len(),
            });
        }

        let room = MAX_FRAME_SIZE - collected.len();
        let budget = poll.min(deadline - now);
        match transport.read_chunk(&mut buf[..room], budget).await? {
            ReadOutcome::Data(n) => {
                tracing::trace!("Read {} bytes: {}", n, hex::encode_upper(&buf[..n]));
                collected.extend_from_slice(&buf[..n]);
            }
            ReadOutcome::WouldBlock => {}
            ReadOutcome::Closed => {
                if collected.len() >= MIN_FRAME_SIZE {
                    tracing::debug!("Peer closed after {} bytes", collected.len());
                    break;
                }
                return Err(CommunicationError::EndOfStream {
                    received: collected.len(),
                });
            }
        }
    }

    Ok(collected)
}

/// Total length of the frame being collected, as far as is known.
fn expected_len(collected: &[u8]) -> usize {
    if collected.len() < MIN_FRAME_SIZE {
        MIN_FRAME_SIZE
    } else {
        (MIN_FRAME_SIZE + collected[9] as usize).min(MAX_FRAME_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::SimulatedTransport;
    use std::time::Duration;

    const POLL: Duration = Duration::from_millis(10);

    fn reply(payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0x02, 0x0A, b'S', b'O', b'N', b'Y', 0x01, 0x00, 0x01];
        bytes.push(payload.len() as u8);
        bytes.extend_from_slice(payload);
        bytes
    }

    async fn primed(mut transport: SimulatedTransport) -> SimulatedTransport {
        transport.open().await.unwrap();
        transport
            .write_all(&[0x02, 0x0A, b'S', b'O', b'N', b'Y', 0x01, 0x00, 0x01, 0x00])
            .await
            .unwrap();
        transport
    }

    #[tokio::test]
    async fn test_single_read() {
        let mut transport = primed(SimulatedTransport::scripted([reply(&[0x00, 0x01])])).await;
        let bytes = read_response(&mut transport, POLL, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(bytes, reply(&[0x00, 0x01]));
    }

    #[tokio::test]
    async fn test_trickled_bytes_are_joined() {
        let transport = SimulatedTransport::scripted([reply(&[0x00, 0x01, 0x02, 0x03])])
            .with_chunk_size(1)
            .with_chunk_delay(Duration::from_millis(2));
        let mut transport = primed(transport).await;

        let bytes = read_response(&mut transport, POLL, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(bytes.len(), 14);
        assert_eq!(&bytes[10..], &[0x00, 0x01, 0x02, 0x03]);
    }

    #[tokio::test]
    async fn test_oversized_reply_is_capped() {
        let mut long = reply(&[0xAA; 24]);
        long.extend_from_slice(&[0xBB; 10]);
        let mut transport = primed(SimulatedTransport::scripted([long])).await;

        let bytes = read_response(&mut transport, POLL, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(bytes.len(), MAX_FRAME_SIZE);
    }

    #[tokio::test]
    async fn test_timeout_with_nothing_received() {
        let mut transport = primed(SimulatedTransport::silent()).await;
        let timeout = Duration::from_millis(150);

        let start = std::time::Instant::now();
        let err = read_response(&mut transport, POLL, timeout)
            .await
            .unwrap_err();
        let elapsed = start.elapsed();

        assert!(matches!(err, CommunicationError::Timeout { received: 0, .. }));
        assert!(elapsed >= timeout, "gave up early: {:?}", elapsed);
        assert!(elapsed < timeout + Duration::from_millis(500), "overran: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_timeout_with_partial_header() {
        let mut transport = primed(SimulatedTransport::scripted([vec![0x02, 0x0A, b'S']])).await;
        let err = read_response(&mut transport, POLL, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, CommunicationError::Timeout { received: 3, .. }));
    }

    #[tokio::test]
    async fn test_short_payload_returned_at_deadline() {
        // Declares 4 payload bytes, sends 1
        let mut short = reply(&[0x00, 0x01, 0x02, 0x03]);
        short.truncate(11);
        let mut transport = primed(SimulatedTransport::scripted([short])).await;

        let bytes = read_response(&mut transport, POLL, Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(bytes.len(), 11);
    }

    #[tokio::test]
    async fn test_end_of_stream() {
        let mut transport = primed(SimulatedTransport::hanging_up()).await;
        let err = read_response(&mut transport, POLL, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CommunicationError::EndOfStream { received: 0 }));
    }

    #[tokio::test]
    async fn test_not_connected() {
        let mut transport = SimulatedTransport::new();
        let err = read_response(&mut transport, POLL, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CommunicationError::NotConnected));
    }
}
