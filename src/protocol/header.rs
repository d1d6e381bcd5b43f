//! Packet header and framing constants

use bytes::{Buf, BufMut, Bytes};

use super::codec::WireFormat;
use crate::error::ProtocolError;

/// Magic number opening every packet header
pub const PACKET_MAGIC: u32 = 0xCCBE_CCBE;

/// Largest body a packet may carry, in either direction (128 KiB)
pub const PACKET_MAX_DATA_SIZE: usize = 2 * 65536;

/// Header size: magic (4) + type (4) + data size (4) + result (4)
pub const HEADER_SIZE: usize = 16;

/// Size of one stored chunk
pub const CHUNK_SIZE: usize = 65536;

/// Size of a chunk identifier
pub const GUID_SIZE: usize = 16;

/// Operation discriminators carried in the header `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PacketType {
    Ping = 1,
    ChunkWrite = 2,
    ChunkRead = 3,
    ChunkDelete = 4,
}

impl PacketType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(PacketType::Ping),
            2 => Some(PacketType::ChunkWrite),
            3 => Some(PacketType::ChunkRead),
            4 => Some(PacketType::ChunkDelete),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Fixed 16-byte header preceding every packet body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub magic: u32,
    pub packet_type: u32,
    /// Length of the body that follows
    pub data_size: u32,
    /// 0 on success, otherwise a server-defined error code
    pub result: u32,
}

impl PacketHeader {
    pub fn new(packet_type: u32, data_size: u32) -> Self {
        Self {
            magic: PACKET_MAGIC,
            packet_type,
            data_size,
            result: 0,
        }
    }

    /// Check the magic number and the body size cap.
    ///
    /// Magic is checked first, so a corrupt header is reported as such even
    /// when its size field also happens to be out of range.
    pub fn validate(&self) -> std::result::Result<(), ProtocolError> {
        if self.magic != PACKET_MAGIC {
            return Err(ProtocolError::BadMagic { found: self.magic });
        }

        if self.data_size as usize > PACKET_MAX_DATA_SIZE {
            return Err(ProtocolError::OversizedBody {
                size: self.data_size,
                max: PACKET_MAX_DATA_SIZE as u32,
            });
        }

        Ok(())
    }

    /// The result field reinterpreted as the server's signed error code
    pub fn result_code(&self) -> i32 {
        self.result as i32
    }
}

impl WireFormat for PacketHeader {
    const WIRE_SIZE: usize = HEADER_SIZE;

    fn encode_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.magic);
        buf.put_u32_le(self.packet_type);
        buf.put_u32_le(self.data_size);
        buf.put_u32_le(self.result);
    }

    fn decode_from<B: Buf>(buf: &mut B) -> Self {
        Self {
            magic: buf.get_u32_le(),
            packet_type: buf.get_u32_le(),
            data_size: buf.get_u32_le(),
            result: buf.get_u32_le(),
        }
    }
}

/// One header-plus-body unit on the wire.
///
/// The header's `data_size` always matches the body length for packets
/// built here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: PacketHeader,
    body: Bytes,
}

impl Packet {
    pub fn new(packet_type: u32, body: Bytes) -> Self {
        // Saturate rather than wrap; the transport rejects anything this big anyway.
        let data_size = u32::try_from(body.len()).unwrap_or(u32::MAX);
        Self {
            header: PacketHeader::new(packet_type, data_size),
            body,
        }
    }

    /// Set the result code (responses only)
    pub fn with_result(mut self, code: i32) -> Self {
        self.header.result = code as u32;
        self
    }

    pub(crate) fn from_parts(header: PacketHeader, body: Bytes) -> Self {
        Self { header, body }
    }

    pub fn header(&self) -> &PacketHeader {
        &self.header
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}
