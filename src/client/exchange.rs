//! Request/response exchange
//!
//! Pairs each request payload with the response it expects and drives one
//! send-then-receive cycle over the client's connection.
//!
//! ## Exchange Steps
//! 1. Encode the request payload
//! 2. Send a packet with `type = R::PACKET_TYPE`, `result = 0`
//! 3. Receive one packet
//! 4. Response type must equal the request type
//! 5. Response result must be 0; otherwise the body is not decoded
//! 6. Decode the body into `R::Response`

use std::io::{Read, Write};

use super::Client;
use crate::error::{ChunkError, Result};
use crate::protocol::{
    ChunkDeleteRequest, ChunkReadRequest, ChunkReadResponse, ChunkWriteRequest, EmptyResponse,
    Packet, PacketType, PingPayload, WireFormat,
};

/// A request payload bound to its packet type and response payload
pub trait Request: WireFormat {
    const PACKET_TYPE: PacketType;
    type Response: WireFormat;
}

impl Request for PingPayload {
    const PACKET_TYPE: PacketType = PacketType::Ping;
    type Response = PingPayload;
}

impl Request for ChunkWriteRequest {
    const PACKET_TYPE: PacketType = PacketType::ChunkWrite;
    type Response = EmptyResponse;
}

impl Request for ChunkReadRequest {
    const PACKET_TYPE: PacketType = PacketType::ChunkRead;
    type Response = ChunkReadResponse;
}

impl Request for ChunkDeleteRequest {
    const PACKET_TYPE: PacketType = PacketType::ChunkDelete;
    type Response = EmptyResponse;
}

impl<S: Read + Write> Client<S> {
    /// Send `request` and wait for its matching response.
    ///
    /// Transport failures surface as `Io` or `Protocol` and leave the
    /// connection in an unspecified state.
    pub fn exchange<R: Request>(&mut self, request: &R) -> Result<R::Response> {
        let packet_type = R::PACKET_TYPE.as_u32();
        let packet = Packet::new(packet_type, request.encode());

        tracing::debug!("Sending request type {} ({} bytes)", packet_type, packet.body().len());
        self.conn.send_packet(&packet)?;

        tracing::debug!("Receiving response to type {}", packet_type);
        let response = self.conn.recv_packet()?;

        decode_response::<R::Response>(packet_type, &response)
    }
}

/// Check a received packet against the request that produced it and decode
/// its body.
pub fn decode_response<T: WireFormat>(expected_type: u32, packet: &Packet) -> Result<T> {
    let header = packet.header();

    if header.packet_type != expected_type {
        return Err(ChunkError::UnexpectedResponseType {
            expected: expected_type,
            actual: header.packet_type,
        });
    }

    if header.result != 0 {
        let code = header.result_code();
        tracing::debug!("Request type {} failed remotely with code {}", expected_type, code);
        return Err(ChunkError::Remote { code });
    }

    T::decode(packet.body()).map_err(|_| ChunkError::MalformedResponse {
        packet_type: expected_type,
        expected: T::WIRE_SIZE,
        actual: packet.body().len(),
    })
}
