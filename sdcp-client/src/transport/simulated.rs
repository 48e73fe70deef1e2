//! In-memory projector for tests and dry runs.

use super::{ConnectionState, ReadOutcome, Transport};
use crate::error::{ClientError, CommunicationError};
use async_trait::async_trait;
use parking_lot::Mutex;
use sdcp_protocol::value::QUERY_DATA;
use sdcp_protocol::{
    CommandKind, Item, PowerStatus, Switch, HEADER, MIN_FRAME_SIZE, STATUS_OK,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// One I/O event seen by a [`SimulatedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    Write(Vec<u8>),
    Read(Vec<u8>),
}

/// Shared, ordered record of every write and read.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<JournalEntry>>>);

impl Journal {
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.0.lock().clone()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0
            .lock()
            .iter()
            .filter_map(|e| match e {
                JournalEntry::Write(bytes) => Some(bytes.clone()),
                JournalEntry::Read(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    fn push(&self, entry: JournalEntry) {
        self.0.lock().push(entry);
    }
}

#[derive(Debug)]
enum Behavior {
    /// Answer every request like a healthy projector.
    Respond,
    /// Never answer.
    Silent,
    /// Close the connection instead of answering.
    Hangup,
    /// Answer with canned frames, one per request, verbatim.
    Scripted(VecDeque<Vec<u8>>),
}

/// The request most recently written, as the simulator understood it.
#[derive(Debug, Clone)]
struct LastRequest {
    community: [u8; 4],
    kind: u8,
    item: [u8; 2],
    payload: Vec<u8>,
}

/// A transport that fabricates projector replies.
///
/// By default it behaves like a healthy projector: get requests are
/// answered from an in-memory register per item (`00 00` when never set),
/// set requests store their payload and are acknowledged without data, and
/// IR codes get no reply.
#[derive(Debug)]
pub struct SimulatedTransport {
    connected: bool,
    fail_open: bool,
    behavior: Behavior,
    registers: HashMap<[u8; 2], Vec<u8>>,
    last_request: Option<LastRequest>,
    pending: VecDeque<u8>,
    chunk_size: usize,
    chunk_delay: Duration,
    journal: Journal,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self {
            connected: false,
            fail_open: false,
            behavior: Behavior::Respond,
            registers: HashMap::new(),
            last_request: None,
            pending: VecDeque::new(),
            chunk_size: usize::MAX,
            chunk_delay: Duration::ZERO,
            journal: Journal::default(),
        }
    }

    /// A projector that never answers.
    pub fn silent() -> Self {
        Self {
            behavior: Behavior::Silent,
            ..Self::new()
        }
    }

    /// A projector that hangs up instead of answering.
    pub fn hanging_up() -> Self {
        Self {
            behavior: Behavior::Hangup,
            ..Self::new()
        }
    }

    /// A projector answering with `replies`, one per request, in order.
    pub fn scripted(replies: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            behavior: Behavior::Scripted(replies.into_iter().collect()),
            ..Self::new()
        }
    }

    /// A projector that cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            fail_open: true,
            ..Self::new()
        }
    }

    /// Delivers replies in chunks of at most `size` bytes.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Waits `delay` before delivering each chunk.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Presets the value returned for `item`.
    pub fn with_register(mut self, item: Item, value: impl Into<Vec<u8>>) -> Self {
        self.registers.insert(item.code, value.into());
        self
    }

    /// Handle on the I/O record; clones share it.
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Current register value for `item`, if any was set.
    pub fn register(&self, item: &Item) -> Option<&[u8]> {
        self.registers.get(&item.code).map(Vec::as_slice)
    }

    fn understand(frame: &[u8]) -> Option<LastRequest> {
        if frame.len() < MIN_FRAME_SIZE || frame[..2] != HEADER {
            return None;
        }
        let declared = frame[9] as usize;
        let end = (MIN_FRAME_SIZE + declared).min(frame.len());
        Some(LastRequest {
            community: [frame[2], frame[3], frame[4], frame[5]],
            kind: frame[6],
            item: [frame[7], frame[8]],
            payload: frame[MIN_FRAME_SIZE..end].to_vec(),
        })
    }

    /// Builds the reply a healthy projector would send, updating registers.
    fn respond(&mut self, request: &LastRequest) -> Option<Vec<u8>> {
        if Item::from_code(request.item).is_some_and(|item| item.is_ir()) {
            self.apply_ir(request.item);
            return None;
        }

        let payload = if request.kind == CommandKind::Get as u8 {
            self.registers
                .get(&request.item)
                .cloned()
                .unwrap_or_else(|| QUERY_DATA.to_vec())
        } else {
            self.apply_set(request.item, &request.payload);
            Vec::new()
        };

        let mut reply = Vec::with_capacity(MIN_FRAME_SIZE + payload.len());
        reply.extend_from_slice(&HEADER);
        reply.extend_from_slice(&request.community);
        reply.push(STATUS_OK);
        reply.extend_from_slice(&request.item);
        reply.push(payload.len() as u8);
        reply.extend_from_slice(&payload);
        Some(reply)
    }

    fn apply_set(&mut self, item: [u8; 2], payload: &[u8]) {
        self.registers.insert(item, payload.to_vec());
        if item == Item::POWER.code {
            let status = match Switch::from_data_code(payload) {
                Switch::On => PowerStatus::PowerOn,
                Switch::Off => PowerStatus::Standby,
            };
            self.registers
                .insert(Item::STATUS_POWER.code, status.data_code().to_vec());
        }
    }

    fn apply_ir(&mut self, item: [u8; 2]) {
        let status = if item == Item::IR_POWER_ON.code {
            PowerStatus::PowerOn
        } else if item == Item::IR_POWER_OFF.code {
            PowerStatus::Standby
        } else {
            return;
        };
        self.registers
            .insert(Item::STATUS_POWER.code, status.data_code().to_vec());
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn open(&mut self) -> Result<(), ClientError> {
        if self.fail_open {
            return Err(ClientError::Connection {
                addr: self.describe(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        self.connected = true;
        Ok(())
    }

    async fn close(&mut self) {
        self.connected = false;
        self.pending.clear();
    }

    async fn write_all(&mut self, frame: &[u8]) -> Result<(), CommunicationError> {
        if !self.connected {
            return Err(CommunicationError::NotConnected);
        }
        self.journal.push(JournalEntry::Write(frame.to_vec()));

        let request = Self::understand(frame);
        let reply = if let Behavior::Scripted(replies) = &mut self.behavior {
            replies.pop_front()
        } else if matches!(self.behavior, Behavior::Respond) {
            request.clone().and_then(|request| self.respond(&request))
        } else {
            None
        };

        self.last_request = request;
        self.pending = reply.unwrap_or_default().into();
        Ok(())
    }

    async fn read_chunk(
        &mut self,
        buf: &mut [u8],
        poll: Duration,
    ) -> Result<ReadOutcome, CommunicationError> {
        if !self.connected {
            return Err(CommunicationError::NotConnected);
        }

        if self.pending.is_empty() {
            if matches!(self.behavior, Behavior::Hangup) && self.last_request.is_some() {
                return Ok(ReadOutcome::Closed);
            }
            // Nothing to say: behave like a socket whose read timed out
            tokio::time::sleep(poll).await;
            return Ok(ReadOutcome::WouldBlock);
        }

        if !self.chunk_delay.is_zero() {
            tokio::time::sleep(self.chunk_delay).await;
        }

        let n = self.chunk_size.min(buf.len()).min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        self.journal.push(JournalEntry::Read(buf[..n].to_vec()));
        Ok(ReadOutcome::Data(n))
    }

    fn state(&self) -> ConnectionState {
        if self.connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    fn describe(&self) -> String {
        "simulated".to_string()
    }
}
