//! Protocol codec
//!
//! Encoding and decoding of fixed-size wire records.
//!
//! Every record is packed field by field in little-endian order with no
//! padding, so the encoded length is always the sum of its field widths.
//! The in-memory layout of the Rust types is never relied upon.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ChunkError, Result};

/// A record with a fixed, statically known byte size on the wire.
pub trait WireFormat: Sized {
    /// Exact encoded length in bytes
    const WIRE_SIZE: usize;

    /// Append the encoded fields to `buf`
    fn encode_to<B: BufMut>(&self, buf: &mut B);

    /// Read the fields back from `buf`.
    ///
    /// Callers guarantee at least `WIRE_SIZE` bytes remain.
    fn decode_from<B: Buf>(buf: &mut B) -> Self;

    /// Encode into a freshly allocated buffer of exactly `WIRE_SIZE` bytes
    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::WIRE_SIZE);
        self.encode_to(&mut buf);
        buf.freeze()
    }

    /// Decode from the front of `bytes`.
    ///
    /// Fails with [`ChunkError::TruncatedPayload`] when fewer than
    /// `WIRE_SIZE` bytes are supplied. Trailing bytes are ignored.
    fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(ChunkError::TruncatedPayload {
                expected: Self::WIRE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut buf = &bytes[..Self::WIRE_SIZE];
        Ok(Self::decode_from(&mut buf))
    }
}

// =============================================================================
// Field helpers
// =============================================================================

/// Read a fixed-size byte array
pub(crate) fn get_array<const N: usize, B: Buf>(buf: &mut B) -> [u8; N] {
    let mut out = [0u8; N];
    buf.copy_to_slice(&mut out);
    out
}

/// Read a fixed-size byte block onto the heap
pub(crate) fn get_block<const N: usize, B: Buf>(buf: &mut B) -> Box<[u8; N]> {
    let mut out = zeroed_block::<N>();
    buf.copy_to_slice(&mut out[..]);
    out
}

/// Heap-allocated all-zero block
pub(crate) fn zeroed_block<const N: usize>() -> Box<[u8; N]> {
    Box::new([0u8; N])
}
