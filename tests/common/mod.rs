//! Shared test helpers
#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};

use chunkwire::protocol::PACKET_MAGIC;

/// Duplex stream that replays canned input and records everything written
pub struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    pub written: Vec<u8>,
}

impl ScriptedStream {
    pub fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            written: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Raw frame with every header field under test control
pub fn raw_frame(magic: u32, packet_type: u32, data_size: u32, result: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + body.len());
    out.extend_from_slice(&magic.to_le_bytes());
    out.extend_from_slice(&packet_type.to_le_bytes());
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(&result.to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// Well-formed response frame
pub fn response_frame(packet_type: u32, result: i32, body: &[u8]) -> Vec<u8> {
    raw_frame(PACKET_MAGIC, packet_type, body.len() as u32, result as u32, body)
}

/// Read the four header fields back out of written bytes
pub fn parse_header(bytes: &[u8]) -> (u32, u32, u32, u32) {
    let field = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    (field(0), field(4), field(8), field(12))
}
