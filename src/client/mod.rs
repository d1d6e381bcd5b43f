//! Client Module
//!
//! The caller-facing side of the protocol.
//!
//! ## Responsibilities
//! - Own exactly one connection for the client's lifetime
//! - Run one request/response exchange at a time
//! - Validate caller input before anything touches the wire

mod exchange;
mod operations;
mod shared;

use std::io::{Read, Write};
use std::net::TcpStream;

use crate::config::Config;
use crate::error::Result;
use crate::network::Connection;

pub use exchange::{decode_response, Request};
pub use shared::SharedClient;

/// Blocking client for the chunk service
///
/// All operations are strictly sequential: each one sends a single request
/// and waits for its response before returning. There is no timeout unless
/// one is configured, no retry and no pipelining.
pub struct Client<S: Read + Write = TcpStream> {
    config: Config,
    conn: Connection<S>,
}

impl Client<TcpStream> {
    /// Create an undialed client for `config.server_addr`
    pub fn new(config: Config) -> Self {
        Self {
            config,
            conn: Connection::closed(),
        }
    }

    /// Create a client and dial immediately
    pub fn connect(config: Config) -> Result<Self> {
        let mut client = Self::new(config);
        client.dial()?;
        Ok(client)
    }

    /// Open the connection, replacing any existing one
    pub fn dial(&mut self) -> Result<()> {
        self.conn.close();
        self.conn = Connection::connect(&self.config)?;
        Ok(())
    }
}

impl<S: Read + Write> Client<S> {
    /// Wrap an already connected stream
    pub fn from_stream(stream: S) -> Self {
        Self::from_connection(Connection::new(stream, "stream"))
    }

    pub fn from_connection(conn: Connection<S>) -> Self {
        Self {
            config: Config::default(),
            conn,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_open()
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.conn
    }

    /// Release the connection. Safe on a closed or never-dialed client.
    pub fn close(&mut self) {
        self.conn.close();
    }
}
