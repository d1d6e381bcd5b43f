//! Reference chunk server
//!
//! An in-memory implementation of the remote side of the protocol, used for
//! end-to-end tests and local experiments. It is not a storage service:
//! nothing is persisted.

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use bytes::Bytes;
use crossbeam::channel::{self, Receiver};
use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{ChunkError, Result};
use crate::network::Connection;
use crate::protocol::{
    ChunkDeleteRequest, ChunkId, ChunkReadRequest, ChunkReadResponse, ChunkWriteRequest, Packet,
    PacketType, PingPayload, WireFormat, CHUNK_SIZE,
};

/// Result code for a chunk id the store does not hold
pub const ERR_NOT_FOUND: i32 = -2;

/// Result code for unknown packet types and undersized bodies
pub const ERR_INVALID: i32 = -22;

/// Chunks held in memory, keyed by id
#[derive(Default)]
pub struct ChunkStore {
    chunks: RwLock<HashMap<ChunkId, Box<[u8; CHUNK_SIZE]>>>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    pub fn contains(&self, id: &ChunkId) -> bool {
        self.chunks.read().contains_key(id)
    }

    /// Answer one request packet
    pub fn handle(&self, request: &Packet) -> Packet {
        let packet_type = request.header().packet_type;

        match self.dispatch(packet_type, request.body()) {
            Ok(body) => Packet::new(packet_type, body),
            Err(code) => Packet::new(packet_type, Bytes::new()).with_result(code),
        }
    }

    fn dispatch(&self, packet_type: u32, body: &[u8]) -> std::result::Result<Bytes, i32> {
        let Some(kind) = PacketType::from_u32(packet_type) else {
            return Err(ERR_INVALID);
        };

        match kind {
            PacketType::Ping => {
                let ping = PingPayload::decode(body).map_err(|_| ERR_INVALID)?;
                Ok(ping.encode())
            }
            PacketType::ChunkWrite => {
                let req = ChunkWriteRequest::decode(body).map_err(|_| ERR_INVALID)?;
                self.chunks.write().insert(req.chunk_id, req.data);
                Ok(Bytes::new())
            }
            PacketType::ChunkRead => {
                let req = ChunkReadRequest::decode(body).map_err(|_| ERR_INVALID)?;
                let chunks = self.chunks.read();
                let data = chunks.get(&req.chunk_id).ok_or(ERR_NOT_FOUND)?;
                Ok(ChunkReadResponse { data: data.clone() }.encode())
            }
            PacketType::ChunkDelete => {
                let req = ChunkDeleteRequest::decode(body).map_err(|_| ERR_INVALID)?;
                self.chunks
                    .write()
                    .remove(&req.chunk_id)
                    .map(|_| Bytes::new())
                    .ok_or(ERR_NOT_FOUND)
            }
        }
    }
}

/// TCP front end for a [`ChunkStore`]
///
/// ## Architecture
/// - Single acceptor thread
/// - Fixed pool of workers fed through a channel, one connection at a time each
pub struct Server {
    config: Config,
    listener: TcpListener,
    store: Arc<ChunkStore>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind `config.listen_addr`
    pub fn bind(config: Config, store: Arc<ChunkStore>) -> Result<Self> {
        let addr = config.resolve_listen_addr()?;
        let listener = TcpListener::bind(addr)?;

        Ok(Self {
            config,
            listener,
            store,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn store(&self) -> Arc<ChunkStore> {
        Arc::clone(&self.store)
    }

    /// Accept connections until shut down (blocking)
    ///
    /// Workers are detached: a connection still open at shutdown is served
    /// until its client hangs up.
    pub fn run(self) -> Result<()> {
        let local_addr = self.local_addr()?;
        let workers = self.config.server_workers.max(1);
        tracing::info!("Listening on {} with {} workers", local_addr, workers);

        let (sender, receiver) = channel::unbounded::<TcpStream>();
        for id in 0..workers {
            let receiver = receiver.clone();
            let store = Arc::clone(&self.store);
            thread::Builder::new()
                .name(format!("chunkwire-worker-{}", id))
                .spawn(move || worker_loop(id, receiver, store))?;
        }

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            match stream {
                Ok(stream) => {
                    if sender.send(stream).is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            }
        }

        tracing::info!("Server on {} stopped", local_addr);
        Ok(())
    }

    /// Run the accept loop on a background thread
    pub fn spawn(self) -> Result<ServerHandle> {
        let addr = self.local_addr()?;
        let shutdown = Arc::clone(&self.shutdown);
        let store = self.store();

        let thread = thread::Builder::new()
            .name("chunkwire-acceptor".to_string())
            .spawn(move || self.run())?;

        Ok(ServerHandle {
            addr,
            store,
            shutdown,
            thread: Some(thread),
        })
    }
}

fn worker_loop(id: usize, receiver: Receiver<TcpStream>, store: Arc<ChunkStore>) {
    for stream in receiver.iter() {
        tracing::debug!("Worker {} handling a connection", id);
        if let Err(e) = serve_connection(stream, &store) {
            tracing::warn!("Worker {}: connection ended with error: {}", id, e);
        }
    }
    tracing::debug!("Worker {} exiting", id);
}

/// Serve requests on one connection until the client disconnects
fn serve_connection(stream: TcpStream, store: &ChunkStore) -> Result<()> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    // Replies go out without Nagle delay
    stream.set_nodelay(true)?;

    let mut conn = Connection::new(stream, peer_addr);
    tracing::debug!("Connection established from {}", conn.peer_addr());

    // One request, one response, until the client hangs up
    loop {
        let request = match conn.recv_packet() {
            Ok(packet) => packet,
            // Clean hangup between requests
            Err(ChunkError::Io(ref e)) if is_disconnect(e) => {
                tracing::debug!("Client {} disconnected", conn.peer_addr());
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        tracing::trace!(
            "Received packet type {} ({} bytes) from {}",
            request.header().packet_type,
            request.body().len(),
            conn.peer_addr()
        );

        // Failures go back as a result code, never as a dropped connection
        let response = store.handle(&request);
        conn.send_packet(&response)?;
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}

/// Handle to a server running on a background thread
pub struct ServerHandle {
    addr: SocketAddr,
    store: Arc<ChunkStore>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn store(&self) -> &Arc<ChunkStore> {
        &self.store
    }

    /// Stop accepting and wait for the acceptor thread
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        self.shutdown.store(true, Ordering::Release);
        // Wake the blocking accept so it observes the flag.
        let _ = TcpStream::connect(self.addr);

        thread
            .join()
            .map_err(|_| ChunkError::Io(io::Error::new(io::ErrorKind::Other, "acceptor panicked")))?
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("Server shutdown failed: {}", e);
        }
    }
}
