//! Protocol Module
//!
//! Defines the wire protocol spoken with the remote chunk service.
//!
//! ## Packet Format
//! ```text
//! ┌───────────┬──────────┬───────────────┬────────────┬─────────────────────┐
//! │ Magic (4) │ Type (4) │ DataSize (4)  │ Result (4) │ Body (DataSize)     │
//! └───────────┴──────────┴───────────────┴────────────┴─────────────────────┘
//! ```
//! All integers are little-endian with no padding. `Magic` is always
//! `0xCCBECCBE` and `DataSize` never exceeds 131072.
//!
//! ### Packet Types
//! - 1: PING         - req/resp: 131072-byte zero-padded text buffer
//! - 2: CHUNK_WRITE  - req: id (16) + data (65536), resp: empty
//! - 3: CHUNK_READ   - req: id (16), resp: data (65536)
//! - 4: CHUNK_DELETE - req: id (16), resp: empty
//!
//! ### Result
//! - 0: success
//! - anything else: server-defined error code, read as a signed 32-bit value

mod codec;
mod header;
mod payload;

pub use codec::WireFormat;
pub use header::{
    Packet, PacketHeader, PacketType, CHUNK_SIZE, GUID_SIZE, HEADER_SIZE, PACKET_MAGIC,
    PACKET_MAX_DATA_SIZE,
};
pub use payload::{
    ChunkDeleteRequest, ChunkDeleteResponse, ChunkId, ChunkReadRequest, ChunkReadResponse,
    ChunkWriteRequest, ChunkWriteResponse, EmptyResponse, PingPayload, PingRequest, PingResponse,
    PING_BUFFER_SIZE,
};
