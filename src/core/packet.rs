//! # Packet Framer
//!
//! Reads one complete inform packet (header plus length-prefixed payload)
//! from a byte source.
//!
//! The source is read from twice: once for the fixed 40 byte header and once
//! for the payload whose length the header declares. Both reads go through
//! `read_exact`, so a source that delivers bytes in several chunks is handled
//! and a source that ends early is a failure, never a short packet. The source
//! is not read past the end of the packet.
//!
//! A `Packet` is only ever returned whole: any failure discards everything
//! read so far. Retrying or reconnecting is up to the caller.

use crate::config::{IV_LEN, MAX_PAYLOAD_SIZE};
use crate::core::flags::PacketFlags;
use crate::core::header::{DeviceId, Header, HEADER_LEN};
use crate::core::pipeline;
use crate::error::constants::{ERR_HEADER_TOO_SHORT, ERR_NO_PAYLOAD_LENGTH};
use crate::error::{InformError, Result};
use serde::Serialize;
use std::io::{self, Read};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// A decoded inform packet.
///
/// `payload` is the raw wire payload, possibly encrypted and/or compressed.
/// Use [`Packet::resolve_payload`] to get the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Version of the packet format (informational)
    pub packet_version: u32,
    /// Version of the payload format (informational)
    pub payload_version: u32,
    /// Hardware address of the sending device
    pub device_id: DeviceId,
    pub flags: PacketFlags,
    /// AES-128-CBC initialization vector; unused unless `ENCRYPTED` is set
    pub iv: [u8; IV_LEN],
    pub payload: Vec<u8>,
}

impl Packet {
    /// Read one packet from `reader`, accepting payloads up to [`MAX_PAYLOAD_SIZE`].
    ///
    /// # Errors
    /// - `InformError::IncompletePacket` if the header or payload cannot be read
    ///   in full, or the declared payload length is zero
    /// - `InformError::InvalidMagic` if the header does not start with `UBNT`
    /// - `InformError::OversizedPacket` if the declared length exceeds the limit
    pub fn decode<R: Read>(reader: R) -> Result<Self> {
        Self::decode_with_limit(reader, MAX_PAYLOAD_SIZE)
    }

    /// Read one packet, rejecting declared payload lengths above `max_payload`
    /// before allocating.
    pub fn decode_with_limit<R: Read>(mut reader: R, max_payload: usize) -> Result<Self> {
        let mut head = [0u8; HEADER_LEN];
        reader.read_exact(&mut head).map_err(header_read_error)?;

        let header = Header::parse(&head)?;
        let len = checked_payload_len(&header, max_payload)?;

        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .map_err(|e| InformError::IncompletePacket(e.to_string()))?;

        Ok(Self::from_parts(header, payload))
    }

    /// Decode a packet from the start of `bytes`. Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(bytes)
    }

    /// Async counterpart of [`Packet::decode`].
    pub async fn decode_async<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self> {
        Self::decode_async_with_limit(reader, MAX_PAYLOAD_SIZE).await
    }

    /// Async counterpart of [`Packet::decode_with_limit`].
    pub async fn decode_async_with_limit<R: AsyncRead + Unpin>(
        reader: &mut R,
        max_payload: usize,
    ) -> Result<Self> {
        let mut head = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut head)
            .await
            .map_err(header_read_error)?;

        let header = Header::parse(&head)?;
        let len = checked_payload_len(&header, max_payload)?;

        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .await
            .map_err(|e| InformError::IncompletePacket(e.to_string()))?;

        Ok(Self::from_parts(header, payload))
    }

    /// Assemble a packet from a parsed header and its payload.
    pub(crate) fn from_parts(header: Header, payload: Vec<u8>) -> Self {
        debug!(
            device = %header.device_id,
            packet_version = header.packet_version,
            payload_version = header.payload_version,
            flags = %header.flags,
            payload_len = payload.len(),
            "Decoded inform packet"
        );
        Self {
            packet_version: header.packet_version,
            payload_version: header.payload_version,
            device_id: header.device_id,
            flags: header.flags,
            iv: header.iv,
            payload,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags.contains(PacketFlags::ENCRYPTED)
    }

    pub fn is_compressed(&self) -> bool {
        self.flags
            .intersects(PacketFlags::COMPRESSED | PacketFlags::SNAPPY_COMPRESSED)
    }

    /// Decrypt and decompress the payload as the flags require.
    ///
    /// See [`pipeline::resolve_payload`].
    pub fn resolve_payload(&self, key: &[u8]) -> Result<Vec<u8>> {
        pipeline::resolve_payload(self, key)
    }

    /// Header summary without the payload, suitable for structured output.
    pub fn info(&self) -> PacketInfo {
        PacketInfo {
            packet_version: self.packet_version,
            payload_version: self.payload_version,
            device_id: self.device_id,
            flags: self.flags,
            flag_names: self.flags.names(),
            iv: hex::encode(self.iv),
            payload_length: self.payload.len(),
        }
    }
}

/// Serializable view of a packet's header fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketInfo {
    pub packet_version: u32,
    pub payload_version: u32,
    pub device_id: DeviceId,
    pub flags: PacketFlags,
    pub flag_names: Vec<&'static str>,
    pub iv: String,
    pub payload_length: usize,
}

/// Validate the declared payload length of `header`.
pub(crate) fn checked_payload_len(header: &Header, max_payload: usize) -> Result<usize> {
    let declared = header.payload_length as usize;
    if declared == 0 {
        return Err(InformError::IncompletePacket(
            ERR_NO_PAYLOAD_LENGTH.to_string(),
        ));
    }
    if declared > max_payload {
        return Err(InformError::OversizedPacket {
            declared,
            limit: max_payload,
        });
    }
    Ok(declared)
}

fn header_read_error(err: io::Error) -> InformError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => {
            InformError::IncompletePacket(ERR_HEADER_TOO_SHORT.to_string())
        }
        _ => InformError::IncompletePacket(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn wire(flags: u16, payload_len: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"UBNT");
        out.extend_from_slice(&1u32.to_be_bytes());
        out.extend_from_slice(&[0x80, 0x2a, 0xa8, 0x01, 0x02, 0x03]);
        out.extend_from_slice(&flags.to_be_bytes());
        out.extend_from_slice(&[0u8; 16]);
        out.extend_from_slice(&1u32.to_be_bytes());
        out.extend_from_slice(&payload_len.to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// Hands out at most `chunk` bytes per read call.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_decode_plain_packet() {
        let packet = Packet::from_bytes(&wire(0, 5, b"hello")).unwrap();
        assert_eq!(packet.packet_version, 1);
        assert_eq!(packet.payload_version, 1);
        assert_eq!(packet.device_id.to_string(), "80:2a:a8:01:02:03");
        assert!(packet.flags.is_empty());
        assert_eq!(packet.payload, b"hello");
    }

    #[test]
    fn test_short_reads_are_collected() {
        let bytes = wire(0, 5, b"hello");
        let packet = Packet::decode(Trickle { data: &bytes, chunk: 3 }).unwrap();
        assert_eq!(packet.payload, b"hello");
    }

    #[test]
    fn test_header_too_short() {
        let bytes = wire(0, 5, b"hello");
        match Packet::from_bytes(&bytes[..HEADER_LEN - 1]) {
            Err(InformError::IncompletePacket(reason)) => assert_eq!(reason, "header too short"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_zero_length_rejected() {
        match Packet::from_bytes(&wire(0, 0, b"")) {
            Err(InformError::IncompletePacket(reason)) => {
                assert_eq!(reason, "header does not define payload length")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_payload() {
        let result = Packet::from_bytes(&wire(0, 10, b"hello"));
        assert!(matches!(result, Err(InformError::IncompletePacket(_))));
    }

    #[test]
    fn test_oversized_length_rejected_before_read() {
        let result = Packet::decode_with_limit(&wire(0, 1024, b"")[..], 512);
        assert!(matches!(
            result,
            Err(InformError::OversizedPacket {
                declared: 1024,
                limit: 512
            })
        ));
    }

    #[test]
    fn test_reader_left_at_packet_end() {
        let mut bytes = wire(0, 2, b"hi");
        bytes.extend_from_slice(b"next");
        let mut cursor = &bytes[..];
        let packet = Packet::decode(&mut cursor).unwrap();
        assert_eq!(packet.payload, b"hi");
        assert_eq!(cursor, b"next");
    }

    #[test]
    fn test_info_summary() {
        let packet = Packet::from_bytes(&wire(0x0005, 3, b"abc")).unwrap();
        let info = packet.info();
        assert_eq!(info.flag_names, vec!["ENCRYPTED", "SNAPPY_COMPRESSED"]);
        assert_eq!(info.payload_length, 3);
        assert_eq!(info.iv, "00".repeat(16));
        assert!(packet.is_encrypted());
        assert!(packet.is_compressed());
    }

    #[tokio::test]
    async fn test_decode_async() {
        let bytes = wire(0, 5, b"hello");
        let mut reader = &bytes[..];
        let packet = Packet::decode_async(&mut reader).await.unwrap();
        assert_eq!(packet.payload, b"hello");

        let mut short = &bytes[..20];
        match Packet::decode_async(&mut short).await {
            Err(InformError::IncompletePacket(reason)) => assert_eq!(reason, "header too short"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
