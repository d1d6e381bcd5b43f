//! Typed entry points
//!
//! Each operation checks caller-supplied buffers against the fixed on-wire
//! widths first and fails without touching the connection when they differ.

use std::io::{Read, Write};

use super::Client;
use crate::error::Result;
use crate::protocol::{ChunkDeleteRequest, ChunkId, ChunkReadRequest, ChunkWriteRequest, PingPayload};

impl<S: Read + Write> Client<S> {
    /// Send `text` and return the server's reply, trimmed at the first zero
    /// byte. A reply that is not UTF-8 fails with `InvalidText`; use
    /// [`ping_bytes`](Self::ping_bytes) to get it unchanged.
    pub fn ping(&mut self, text: &str) -> Result<String> {
        let request = PingPayload::from_text(text)?;
        self.exchange(&request)?.text()
    }

    /// Like [`ping`](Self::ping) but returns the trimmed reply bytes as sent.
    pub fn ping_bytes(&mut self, text: &str) -> Result<Vec<u8>> {
        let request = PingPayload::from_text(text)?;
        let response = self.exchange(&request)?;
        Ok(response.text_bytes().to_vec())
    }

    /// Store one chunk. `data` must be exactly `CHUNK_SIZE` bytes.
    pub fn chunk_write(&mut self, id: &[u8], data: &[u8]) -> Result<()> {
        let request = ChunkWriteRequest::new(ChunkId::from_slice(id)?, data)?;
        self.exchange(&request)?;
        tracing::debug!("Wrote chunk {}", request.chunk_id);
        Ok(())
    }

    /// Fetch one chunk. The full fixed-width block is returned as is.
    pub fn chunk_read(&mut self, id: &[u8]) -> Result<Vec<u8>> {
        let request = ChunkReadRequest::new(ChunkId::from_slice(id)?);
        let response = self.exchange(&request)?;
        let data: Box<[u8]> = response.data;
        Ok(data.into_vec())
    }

    pub fn chunk_delete(&mut self, id: &[u8]) -> Result<()> {
        let request = ChunkDeleteRequest::new(ChunkId::from_slice(id)?);
        self.exchange(&request)?;
        tracing::debug!("Deleted chunk {}", request.chunk_id);
        Ok(())
    }
}
