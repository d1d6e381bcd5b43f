//! Error types for chunkwire
//!
//! Every failure the client can surface is a variant of [`ChunkError`], so
//! callers branch on the kind instead of inspecting message text.

use thiserror::Error;

/// Result type alias using ChunkError
pub type Result<T> = std::result::Result<T, ChunkError>;

/// Framing violations detected while receiving a packet.
///
/// Either one means the stream is desynchronized or the peer does not speak
/// this protocol. The connection must not be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("bad magic: 0x{found:08x}")]
    BadMagic { found: u32 },

    #[error("oversized body: {size} bytes (max {max})")]
    OversizedBody { size: u32, max: u32 },
}

/// Unified error type for chunkwire operations
#[derive(Debug, Error)]
pub enum ChunkError {
    // -------------------------------------------------------------------------
    // Connection / I/O Errors
    // -------------------------------------------------------------------------
    #[error("failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("client is not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("unexpected response type {actual}, should be {expected}")]
    UnexpectedResponseType { expected: u32, actual: u32 },

    #[error("remote error: {code}")]
    Remote { code: i32 },

    #[error("truncated payload: need {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("malformed response to packet type {packet_type}: need {expected} bytes, got {actual}")]
    MalformedResponse {
        packet_type: u32,
        expected: usize,
        actual: usize,
    },

    #[error("ping reply is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidText { valid_up_to: usize },

    // -------------------------------------------------------------------------
    // Caller Input Errors
    // -------------------------------------------------------------------------
    #[error("invalid chunk id size: expected {expected} bytes, got {actual}")]
    InvalidIdSize { expected: usize, actual: usize },

    #[error("invalid data size: expected {expected} bytes, got {actual}")]
    InvalidDataSize { expected: usize, actual: usize },

    #[error("input too large: {actual} bytes (max {max})")]
    InputTooLarge { max: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChunkError {
    /// True when the caller supplied a wrongly sized argument. No I/O was
    /// attempted in that case.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ChunkError::InvalidIdSize { .. }
                | ChunkError::InvalidDataSize { .. }
                | ChunkError::InputTooLarge { .. }
        )
    }

    /// True when the framing may be desynchronized and the connection has to
    /// be re-established before another exchange.
    pub fn connection_unusable(&self) -> bool {
        matches!(
            self,
            ChunkError::Io(_) | ChunkError::Protocol(_) | ChunkError::NotConnected
        )
    }
}
