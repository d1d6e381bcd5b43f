//! Exchange Tests
//!
//! One request, one response: type pairing, remote errors and decode
//! failures, driven against scripted responses.

#[path = "../common/mod.rs"]
mod common;

use chunkwire::protocol::{
    ChunkDeleteRequest, ChunkId, ChunkReadRequest, ChunkWriteRequest, EmptyResponse, PacketType,
    PingPayload, CHUNK_SIZE, GUID_SIZE, HEADER_SIZE, PACKET_MAGIC, PING_BUFFER_SIZE,
};
use chunkwire::{ChunkError, Client, ProtocolError};
use common::{parse_header, raw_frame, response_frame, ScriptedStream};

fn client_with(responses: Vec<u8>) -> Client<ScriptedStream> {
    Client::from_stream(ScriptedStream::new(responses))
}

fn sent(client: &Client<ScriptedStream>) -> &[u8] {
    &client.connection().get_ref().unwrap().written
}

fn id() -> ChunkId {
    ChunkId::new([7u8; GUID_SIZE])
}

// =============================================================================
// Successful Exchanges
// =============================================================================

#[test]
fn test_exchange_sends_request_header() {
    let mut client = client_with(response_frame(4, 0, &[]));
    let response = client.exchange(&ChunkDeleteRequest::new(id())).unwrap();
    assert_eq!(response, EmptyResponse);

    let bytes = sent(&client);
    assert_eq!(bytes.len(), HEADER_SIZE + GUID_SIZE);
    assert_eq!(
        parse_header(bytes),
        (PACKET_MAGIC, PacketType::ChunkDelete as u32, GUID_SIZE as u32, 0)
    );
    assert_eq!(&bytes[HEADER_SIZE..], id().as_bytes());
}

#[test]
fn test_exchange_ping_round_trip() {
    let reply = PingPayload::from_text("pong").unwrap();
    let mut client = client_with(response_frame(1, 0, &reply.value[..]));

    let response = client
        .exchange(&PingPayload::from_text("ping").unwrap())
        .unwrap();
    assert_eq!(response.text().unwrap(), "pong");
    assert_eq!(sent(&client).len(), HEADER_SIZE + PING_BUFFER_SIZE);
}

#[test]
fn test_exchange_read_returns_block() {
    let data = vec![0xABu8; CHUNK_SIZE];
    let mut client = client_with(response_frame(3, 0, &data));

    let response = client.exchange(&ChunkReadRequest::new(id())).unwrap();
    assert_eq!(&response.data[..], &data[..]);
}

#[test]
fn test_sequential_exchanges_share_connection() {
    let mut input = response_frame(2, 0, &[]);
    input.extend(response_frame(4, 0, &[]));
    let mut client = client_with(input);

    let write = ChunkWriteRequest::new(id(), &vec![1u8; CHUNK_SIZE]).unwrap();
    client.exchange(&write).unwrap();
    client.exchange(&ChunkDeleteRequest::new(id())).unwrap();

    let bytes = sent(&client);
    let second = HEADER_SIZE + GUID_SIZE + CHUNK_SIZE;
    assert_eq!(parse_header(bytes).1, 2);
    assert_eq!(parse_header(&bytes[second..]).1, 4);
}

// =============================================================================
// Response Validation
// =============================================================================

#[test]
fn test_unexpected_response_type() {
    // Body is deliberately not a valid read response.
    let mut client = client_with(response_frame(1, 0, b"junk"));

    let err = client.exchange(&ChunkReadRequest::new(id())).unwrap_err();
    assert!(matches!(
        err,
        ChunkError::UnexpectedResponseType { expected: 3, actual: 1 }
    ));
}

#[test]
fn test_remote_error_carries_code() {
    let mut client = client_with(response_frame(3, -2, &[]));

    let err = client.exchange(&ChunkReadRequest::new(id())).unwrap_err();
    assert!(matches!(err, ChunkError::Remote { code: -2 }));
    assert!(!err.connection_unusable());
}

#[test]
fn test_remote_error_does_not_decode_body() {
    // A full-size body with a failure result must still be an error.
    let mut client = client_with(response_frame(3, 5, &vec![0u8; CHUNK_SIZE]));

    let err = client.exchange(&ChunkReadRequest::new(id())).unwrap_err();
    assert!(matches!(err, ChunkError::Remote { code: 5 }));
}

#[test]
fn test_remote_error_code_is_signed() {
    let mut client = client_with(raw_frame(PACKET_MAGIC, 2, 0, u32::MAX, &[]));
    let write = ChunkWriteRequest::new(id(), &vec![0u8; CHUNK_SIZE]).unwrap();

    let err = client.exchange(&write).unwrap_err();
    assert!(matches!(err, ChunkError::Remote { code: -1 }));
}

#[test]
fn test_malformed_response() {
    let mut client = client_with(response_frame(3, 0, &[0u8; 10]));

    let err = client.exchange(&ChunkReadRequest::new(id())).unwrap_err();
    assert!(matches!(
        err,
        ChunkError::MalformedResponse { packet_type: 3, expected: CHUNK_SIZE, actual: 10 }
    ));
}

#[test]
fn test_bad_magic_response() {
    let mut client = client_with(raw_frame(0x1234_5678, 4, 0, 0, &[]));

    let err = client.exchange(&ChunkDeleteRequest::new(id())).unwrap_err();
    assert!(matches!(
        err,
        ChunkError::Protocol(ProtocolError::BadMagic { found: 0x1234_5678 })
    ));
    assert!(err.connection_unusable());
}

#[test]
fn test_peer_closes_before_response() {
    let mut client = client_with(Vec::new());

    let err = client.exchange(&ChunkDeleteRequest::new(id())).unwrap_err();
    assert!(matches!(err, ChunkError::Io(_)));
    // The request itself went out.
    assert_eq!(sent(&client).len(), HEADER_SIZE + GUID_SIZE);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_exchange_after_close() {
    let mut client = client_with(response_frame(4, 0, &[]));
    client.close();
    client.close();

    assert!(!client.is_connected());
    let err = client.exchange(&ChunkDeleteRequest::new(id())).unwrap_err();
    assert!(matches!(err, ChunkError::NotConnected));
}
