//! Thread-safe client wrapper

use std::io::{Read, Write};
use std::net::TcpStream;

use parking_lot::Mutex;

use super::Client;
use crate::config::Config;
use crate::error::Result;

/// A [`Client`] behind a mutex so several threads can share one connection.
///
/// The lock is held for the whole exchange, so requests from different
/// threads are serialized and never interleave on the wire.
pub struct SharedClient<S: Read + Write = TcpStream> {
    inner: Mutex<Client<S>>,
}

impl SharedClient<TcpStream> {
    pub fn connect(config: Config) -> Result<Self> {
        Ok(Self::new(Client::connect(config)?))
    }
}

impl<S: Read + Write> SharedClient<S> {
    pub fn new(client: Client<S>) -> Self {
        Self {
            inner: Mutex::new(client),
        }
    }

    /// Run `f` with exclusive access to the client
    pub fn with<T>(&self, f: impl FnOnce(&mut Client<S>) -> T) -> T {
        f(&mut *self.inner.lock())
    }

    pub fn ping(&self, text: &str) -> Result<String> {
        self.inner.lock().ping(text)
    }

    pub fn ping_bytes(&self, text: &str) -> Result<Vec<u8>> {
        self.inner.lock().ping_bytes(text)
    }

    pub fn chunk_write(&self, id: &[u8], data: &[u8]) -> Result<()> {
        self.inner.lock().chunk_write(id, data)
    }

    pub fn chunk_read(&self, id: &[u8]) -> Result<Vec<u8>> {
        self.inner.lock().chunk_read(id)
    }

    pub fn chunk_delete(&self, id: &[u8]) -> Result<()> {
        self.inner.lock().chunk_delete(id)
    }

    pub fn close(&self) {
        self.inner.lock().close();
    }

    pub fn into_inner(self) -> Client<S> {
        self.inner.into_inner()
    }
}
