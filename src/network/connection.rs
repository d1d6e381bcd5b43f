//! Packet Transport
//!
//! Frames packets onto a byte stream and reads them back.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use bytes::{BufMut, BytesMut};

use crate::config::Config;
use crate::error::{ChunkError, ProtocolError, Result};
use crate::protocol::{Packet, PacketHeader, WireFormat, HEADER_SIZE, PACKET_MAX_DATA_SIZE};

/// One exclusively owned stream carrying framed packets
///
/// Generic over the stream so the same framing serves TCP sockets and
/// in-memory streams alike.
pub struct Connection<S: Read + Write = TcpStream> {
    /// Underlying stream; `None` once closed or if never opened
    stream: Option<S>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Dial `config.server_addr` and apply the configured socket options
    pub fn connect(config: &Config) -> Result<Self> {
        let addr = config.server_addr.clone();
        let fail = |source: io::Error| ChunkError::Connection {
            addr: addr.clone(),
            source,
        };

        let candidates: Vec<SocketAddr> = addr.to_socket_addrs().map_err(fail)?.collect();
        let stream = dial(&candidates, config).map_err(fail)?;

        // Small request frames should not wait on Nagle's algorithm
        stream.set_nodelay(config.nodelay).map_err(fail)?;
        stream.set_read_timeout(config.read_timeout()).map_err(fail)?;
        stream.set_write_timeout(config.write_timeout()).map_err(fail)?;

        tracing::info!("Connected to {}", addr);
        Ok(Self::new(stream, addr))
    }
}

fn dial(candidates: &[SocketAddr], config: &Config) -> io::Result<TcpStream> {
    let Some(timeout) = config.connect_timeout() else {
        return TcpStream::connect(candidates);
    };

    let mut last_err = None;
    for addr in candidates {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "address resolved to nothing")
    }))
}

impl<S: Read + Write> Connection<S> {
    /// Wrap an already established stream
    pub fn new(stream: S, peer_addr: impl Into<String>) -> Self {
        Self {
            stream: Some(stream),
            peer_addr: peer_addr.into(),
        }
    }

    /// A connection that was never opened
    pub fn closed() -> Self {
        Self {
            stream: None,
            peer_addr: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Borrow the underlying stream, if still open
    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    fn stream_mut(&mut self) -> Result<&mut S> {
        self.stream.as_mut().ok_or(ChunkError::NotConnected)
    }

    /// Write header then body as a single frame.
    ///
    /// A write that cannot transfer every byte fails with `Io`; nothing is
    /// retried.
    pub fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        let body = packet.body();
        if body.len() > PACKET_MAX_DATA_SIZE {
            return Err(ProtocolError::OversizedBody {
                size: packet.header().data_size,
                max: PACKET_MAX_DATA_SIZE as u32,
            }
            .into());
        }

        let mut frame = BytesMut::with_capacity(HEADER_SIZE + body.len());
        packet.header().encode_to(&mut frame);
        frame.put_slice(body);

        tracing::trace!(
            "Sending {} byte frame (type {}) to {}",
            frame.len(),
            packet.header().packet_type,
            self.peer_addr
        );

        // Header and body go out together in one write
        let stream = self.stream_mut()?;
        stream.write_all(&frame)?;
        stream.flush()?;
        Ok(())
    }

    /// Read one packet: the fixed header, then exactly `data_size` body bytes.
    ///
    /// The header is validated before any body buffer is allocated.
    pub fn recv_packet(&mut self) -> Result<Packet> {
        let peer_addr = self.peer_addr.clone();
        let stream = self.stream_mut()?;

        // Fixed-size header first
        tracing::debug!("Receiving packet header from {}", peer_addr);
        let mut raw = [0u8; HEADER_SIZE];
        stream.read_exact(&mut raw)?;
        let header = PacketHeader::decode(&raw)?;

        // Magic, then size cap; the body is never read on a bad header
        if let Err(violation) = header.validate() {
            tracing::warn!("Rejecting packet from {}: {}", peer_addr, violation);
            return Err(violation.into());
        }

        let size = header.data_size as usize;
        let mut body = BytesMut::zeroed(size);
        // Zero-length bodies skip the read entirely
        if size > 0 {
            tracing::debug!("Receiving {} byte packet body from {}", size, peer_addr);
            stream.read_exact(&mut body)?;
        }

        Ok(Packet::from_parts(header, body.freeze()))
    }

    /// Release the stream. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::info!("Closed connection to {}", self.peer_addr);
        }
    }
}
