//! Network Module
//!
//! Packet transport over byte streams, plus an in-memory reference server.
//!
//! ## Architecture
//! - `Connection` owns one stream and moves whole packets across it
//! - `Server` accepts TCP connections and answers from a `ChunkStore`

mod connection;
mod server;

pub use connection::Connection;
pub use server::{ChunkStore, Server, ServerHandle, ERR_INVALID, ERR_NOT_FOUND};
