//! # chunkwire
//!
//! Client for a remote chunk storage service speaking a fixed-header,
//! length-prefixed binary protocol over a single TCP connection:
//! - 16-byte little-endian packet header with magic and size cap
//! - Fixed-size typed payloads (ping, chunk write/read/delete)
//! - Strictly sequential, blocking request/response exchanges
//! - Closed error taxonomy callers can branch on
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Operation Facade                         │
//! │        ping / chunk_write / chunk_read / chunk_delete        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Request/Response Exchange                    │
//! │           (one in-flight request per connection)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Packet Transport                          │
//! │          header read → validate → exact body read            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Wire Codec                             │
//! │            little-endian, no padding, fixed sizes            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use chunkwire::{ChunkId, Client, Config, CHUNK_SIZE};
//!
//! let mut client = Client::connect(Config::default())?;
//! assert_eq!(client.ping("Hello world!")?, "Hello world!");
//!
//! let id = ChunkId::random();
//! client.chunk_write(id.as_bytes(), &vec![0u8; CHUNK_SIZE])?;
//! let data = client.chunk_read(id.as_bytes())?;
//! assert_eq!(data.len(), CHUNK_SIZE);
//! client.chunk_delete(id.as_bytes())?;
//! client.close();
//! # Ok::<(), chunkwire::ChunkError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ChunkError, ProtocolError, Result};
pub use config::Config;
pub use client::{Client, SharedClient};
pub use protocol::{ChunkId, PacketType, CHUNK_SIZE, GUID_SIZE, PACKET_MAX_DATA_SIZE};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of chunkwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
