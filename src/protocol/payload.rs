//! Typed request/response payloads
//!
//! One fixed-size record per operation and direction. Large buffers live on
//! the heap so a payload can be moved around cheaply.

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};
use uuid::Uuid;

use super::codec::{get_array, get_block, zeroed_block, WireFormat};
use super::header::{CHUNK_SIZE, GUID_SIZE, PACKET_MAX_DATA_SIZE};
use crate::error::{ChunkError, Result};

/// Width of the ping text buffer
pub const PING_BUFFER_SIZE: usize = PACKET_MAX_DATA_SIZE;

// =============================================================================
// Chunk identifier
// =============================================================================

/// Opaque 16-byte key addressing one chunk
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId([u8; GUID_SIZE]);

impl ChunkId {
    pub const fn new(bytes: [u8; GUID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Fresh random identifier (UUID v4 bytes)
    pub fn random() -> Self {
        Self(*Uuid::new_v4().as_bytes())
    }

    /// Copy an identifier out of a caller-supplied slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let id: [u8; GUID_SIZE] = bytes.try_into().map_err(|_| ChunkError::InvalidIdSize {
            expected: GUID_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; GUID_SIZE] {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Uuid::from_bytes(self.0).hyphenated())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({})", self)
    }
}

impl FromStr for ChunkId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(*Uuid::parse_str(s)?.as_bytes()))
    }
}

impl WireFormat for ChunkId {
    const WIRE_SIZE: usize = GUID_SIZE;

    fn encode_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.0);
    }

    fn decode_from<B: Buf>(buf: &mut B) -> Self {
        Self(get_array(buf))
    }
}

// =============================================================================
// Ping
// =============================================================================

/// Zero-padded text buffer used by both ping directions
#[derive(Clone, PartialEq, Eq)]
pub struct PingPayload {
    pub value: Box<[u8; PING_BUFFER_SIZE]>,
}

pub type PingRequest = PingPayload;
pub type PingResponse = PingPayload;

impl PingPayload {
    /// Copy `text` into a zeroed buffer, rejecting text wider than the buffer
    pub fn from_text(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() > PING_BUFFER_SIZE {
            return Err(ChunkError::InputTooLarge {
                max: PING_BUFFER_SIZE,
                actual: bytes.len(),
            });
        }

        let mut value = zeroed_block::<PING_BUFFER_SIZE>();
        value[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { value })
    }

    /// Bytes up to the first zero byte, or the whole buffer if there is none
    pub fn text_bytes(&self) -> &[u8] {
        let end = self
            .value
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.value.len());
        &self.value[..end]
    }

    /// [`text_bytes`](Self::text_bytes) as a string. Invalid UTF-8 is an
    /// error, never replaced.
    pub fn text(&self) -> Result<String> {
        std::str::from_utf8(self.text_bytes())
            .map(str::to_owned)
            .map_err(|e| ChunkError::InvalidText {
                valid_up_to: e.valid_up_to(),
            })
    }
}

impl fmt::Debug for PingPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = String::from_utf8_lossy(self.text_bytes());
        f.debug_struct("PingPayload").field("text", &text).finish()
    }
}

impl WireFormat for PingPayload {
    const WIRE_SIZE: usize = PING_BUFFER_SIZE;

    fn encode_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.value[..]);
    }

    fn decode_from<B: Buf>(buf: &mut B) -> Self {
        Self {
            value: get_block(buf),
        }
    }
}

// =============================================================================
// Chunk operations
// =============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct ChunkWriteRequest {
    pub chunk_id: ChunkId,
    pub data: Box<[u8; CHUNK_SIZE]>,
}

impl ChunkWriteRequest {
    /// Build from caller buffers; `data` must be exactly one chunk wide
    pub fn new(chunk_id: ChunkId, data: &[u8]) -> Result<Self> {
        if data.len() != CHUNK_SIZE {
            return Err(ChunkError::InvalidDataSize {
                expected: CHUNK_SIZE,
                actual: data.len(),
            });
        }

        let mut block = zeroed_block::<CHUNK_SIZE>();
        block.copy_from_slice(data);
        Ok(Self {
            chunk_id,
            data: block,
        })
    }
}

impl fmt::Debug for ChunkWriteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkWriteRequest")
            .field("chunk_id", &self.chunk_id)
            .finish_non_exhaustive()
    }
}

impl WireFormat for ChunkWriteRequest {
    const WIRE_SIZE: usize = GUID_SIZE + CHUNK_SIZE;

    fn encode_to<B: BufMut>(&self, buf: &mut B) {
        self.chunk_id.encode_to(buf);
        buf.put_slice(&self.data[..]);
    }

    fn decode_from<B: Buf>(buf: &mut B) -> Self {
        Self {
            chunk_id: ChunkId::decode_from(buf),
            data: get_block(buf),
        }
    }
}

/// Requests whose body is only a chunk identifier. Each gets its own type so
/// it can be bound to its own packet type.
macro_rules! chunk_id_request {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            pub chunk_id: ChunkId,
        }

        impl $name {
            pub fn new(chunk_id: ChunkId) -> Self {
                Self { chunk_id }
            }
        }

        impl WireFormat for $name {
            const WIRE_SIZE: usize = GUID_SIZE;

            fn encode_to<B: BufMut>(&self, buf: &mut B) {
                self.chunk_id.encode_to(buf);
            }

            fn decode_from<B: Buf>(buf: &mut B) -> Self {
                Self {
                    chunk_id: ChunkId::decode_from(buf),
                }
            }
        }
    };
}

chunk_id_request!(ChunkReadRequest);
chunk_id_request!(ChunkDeleteRequest);

#[derive(Clone, PartialEq, Eq)]
pub struct ChunkReadResponse {
    pub data: Box<[u8; CHUNK_SIZE]>,
}

impl fmt::Debug for ChunkReadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkReadResponse").finish_non_exhaustive()
    }
}

impl WireFormat for ChunkReadResponse {
    const WIRE_SIZE: usize = CHUNK_SIZE;

    fn encode_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.data[..]);
    }

    fn decode_from<B: Buf>(buf: &mut B) -> Self {
        Self {
            data: get_block(buf),
        }
    }
}

/// Zero-length response body (write and delete)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyResponse;

pub type ChunkWriteResponse = EmptyResponse;
pub type ChunkDeleteResponse = EmptyResponse;

impl WireFormat for EmptyResponse {
    const WIRE_SIZE: usize = 0;

    fn encode_to<B: BufMut>(&self, _buf: &mut B) {}

    fn decode_from<B: Buf>(_buf: &mut B) -> Self {
        EmptyResponse
    }
}
