//! Connection Tests
//!
//! Framing, header validation and lifecycle of the packet transport.

#[path = "../common/mod.rs"]
mod common;

use std::io::{Cursor, ErrorKind};

use bytes::Bytes;
use chunkwire::network::Connection;
use chunkwire::protocol::{Packet, HEADER_SIZE, PACKET_MAGIC, PACKET_MAX_DATA_SIZE};
use chunkwire::{ChunkError, ProtocolError};
use common::{parse_header, raw_frame, response_frame, ScriptedStream};

fn reader(bytes: Vec<u8>) -> Connection<ScriptedStream> {
    Connection::new(ScriptedStream::new(bytes), "test")
}

fn written(conn: &Connection<ScriptedStream>) -> &[u8] {
    &conn.get_ref().unwrap().written
}

// =============================================================================
// Send Tests
// =============================================================================

#[test]
fn test_send_writes_header_then_body() {
    let mut conn = Connection::new(Cursor::new(Vec::new()), "test");
    let packet = Packet::new(3, Bytes::from_static(b"0123456789abcdef"));

    conn.send_packet(&packet).unwrap();

    let bytes = conn.get_ref().unwrap().get_ref();
    assert_eq!(bytes.len(), HEADER_SIZE + 16);
    assert_eq!(parse_header(bytes), (PACKET_MAGIC, 3, 16, 0));
    assert_eq!(&bytes[HEADER_SIZE..], b"0123456789abcdef");
}

#[test]
fn test_send_empty_body() {
    let mut conn = reader(Vec::new());
    conn.send_packet(&Packet::new(4, Bytes::new())).unwrap();

    assert_eq!(written(&conn).len(), HEADER_SIZE);
    assert_eq!(parse_header(written(&conn)), (PACKET_MAGIC, 4, 0, 0));
}

#[test]
fn test_send_carries_result_code() {
    let mut conn = reader(Vec::new());
    conn.send_packet(&Packet::new(3, Bytes::new()).with_result(-2)).unwrap();

    assert_eq!(parse_header(written(&conn)).3, 0xFFFF_FFFE);
}

#[test]
fn test_send_rejects_oversized_body() {
    let mut conn = reader(Vec::new());
    let packet = Packet::new(1, Bytes::from(vec![0u8; PACKET_MAX_DATA_SIZE + 1]));

    let err = conn.send_packet(&packet).unwrap_err();
    assert!(matches!(
        err,
        ChunkError::Protocol(ProtocolError::OversizedBody { .. })
    ));
    assert!(written(&conn).is_empty());
}

#[test]
fn test_send_accepts_size_cap() {
    let mut conn = reader(Vec::new());
    let packet = Packet::new(1, Bytes::from(vec![7u8; PACKET_MAX_DATA_SIZE]));

    conn.send_packet(&packet).unwrap();
    assert_eq!(written(&conn).len(), HEADER_SIZE + PACKET_MAX_DATA_SIZE);
}

// =============================================================================
// Receive Tests
// =============================================================================

#[test]
fn test_recv_packet() {
    let mut conn = reader(response_frame(3, 0, b"payload"));
    let packet = conn.recv_packet().unwrap();

    assert_eq!(packet.header().packet_type, 3);
    assert_eq!(packet.header().data_size, 7);
    assert_eq!(packet.header().result, 0);
    assert_eq!(&packet.body()[..], b"payload");
}

#[test]
fn test_recv_zero_size_body_reads_nothing_more() {
    let mut input = response_frame(2, 0, &[]);
    input.extend(response_frame(1, 0, b"next"));
    let mut conn = reader(input);

    let first = conn.recv_packet().unwrap();
    assert!(first.body().is_empty());

    let second = conn.recv_packet().unwrap();
    assert_eq!(second.header().packet_type, 1);
    assert_eq!(&second.body()[..], b"next");
}

#[test]
fn test_recv_rejects_bad_magic_for_any_size() {
    for size in [0u32, 1, 16, PACKET_MAX_DATA_SIZE as u32] {
        let body = vec![0u8; size as usize];
        let mut conn = reader(raw_frame(0xDEAD_BEEF, 1, size, 0, &body));

        let err = conn.recv_packet().unwrap_err();
        assert!(
            matches!(
                err,
                ChunkError::Protocol(ProtocolError::BadMagic { found: 0xDEAD_BEEF })
            ),
            "size {} gave {:?}",
            size,
            err
        );
    }
}

#[test]
fn test_recv_rejects_oversized_before_reading_body() {
    // No body bytes follow: a body read would surface as Io instead.
    let mut conn = reader(raw_frame(PACKET_MAGIC, 1, PACKET_MAX_DATA_SIZE as u32 + 1, 0, &[]));

    let err = conn.recv_packet().unwrap_err();
    assert!(matches!(
        err,
        ChunkError::Protocol(ProtocolError::OversizedBody { size: 131073, max: 131072 })
    ));
}

#[test]
fn test_recv_rejects_huge_size_field() {
    let mut conn = reader(raw_frame(PACKET_MAGIC, 1, u32::MAX, 0, &[]));
    assert!(matches!(
        conn.recv_packet(),
        Err(ChunkError::Protocol(ProtocolError::OversizedBody { .. }))
    ));
}

#[test]
fn test_recv_short_body_is_io_error() {
    let mut conn = reader(raw_frame(PACKET_MAGIC, 3, 100, 0, &[0u8; 40]));

    match conn.recv_packet() {
        Err(ChunkError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_recv_short_header_is_io_error() {
    let mut conn = reader(vec![0xBE, 0xCC, 0xBE, 0xCC, 0x01]);
    let err = conn.recv_packet().unwrap_err();
    assert!(matches!(err, ChunkError::Io(_)));
    assert!(err.connection_unusable());
}

#[test]
fn test_recv_on_closed_stream() {
    let mut conn = reader(Vec::new());
    assert!(matches!(conn.recv_packet(), Err(ChunkError::Io(_))));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_close_is_idempotent() {
    let mut conn = reader(Vec::new());
    assert!(conn.is_open());

    conn.close();
    conn.close();
    assert!(!conn.is_open());
    assert!(conn.get_ref().is_none());
}

#[test]
fn test_never_opened_connection() {
    let mut conn: Connection<ScriptedStream> = Connection::closed();
    conn.close();

    assert!(matches!(
        conn.send_packet(&Packet::new(1, Bytes::new())),
        Err(ChunkError::NotConnected)
    ));
    assert!(matches!(conn.recv_packet(), Err(ChunkError::NotConnected)));
}

#[test]
fn test_use_after_close() {
    let mut conn = reader(response_frame(1, 0, &[]));
    conn.close();
    assert!(matches!(conn.recv_packet(), Err(ChunkError::NotConnected)));
}
