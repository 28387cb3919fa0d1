//! Stream framing for inform packets.
//!
//! [`InformCodec`] plugs into `tokio_util::codec::FramedRead` for callers
//! that receive packets over a long-lived stream. Unlike [`Packet::decode`],
//! a short buffer is not an error here: the codec waits for more bytes until
//! the stream ends.

use crate::config::MAX_PAYLOAD_SIZE;
use crate::core::header::{Header, HEADER_LEN};
use crate::core::packet::{checked_payload_len, Packet};
use crate::error::constants::{ERR_HEADER_TOO_SHORT, ERR_STREAM_ENDED};
use crate::error::{InformError, Result};
use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

/// Decoder for a stream of back-to-back inform packets.
///
/// Bad magic, zero and oversized lengths fail as soon as the header is
/// buffered, without waiting for the payload.
#[derive(Debug, Clone, Copy)]
pub struct InformCodec {
    max_payload_size: usize,
}

impl Default for InformCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl InformCodec {
    pub fn new() -> Self {
        Self::with_max_payload_size(MAX_PAYLOAD_SIZE)
    }

    pub fn with_max_payload_size(max_payload_size: usize) -> Self {
        Self { max_payload_size }
    }
}

impl Decoder for InformCodec {
    type Item = Packet;
    type Error = InformError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < HEADER_LEN {
            src.reserve(HEADER_LEN - src.len());
            return Ok(None);
        }

        let mut head = [0u8; HEADER_LEN];
        head.copy_from_slice(&src[..HEADER_LEN]);
        let header = Header::parse(&head)?;
        let len = checked_payload_len(&header, self.max_payload_size)?;

        let total = HEADER_LEN + len;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LEN);
        let payload = src.split_to(len).to_vec();
        Ok(Some(Packet::from_parts(header, payload)))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        match self.decode(src)? {
            Some(packet) => Ok(Some(packet)),
            None if src.is_empty() => Ok(None),
            None if src.len() < HEADER_LEN => Err(InformError::IncompletePacket(
                ERR_HEADER_TOO_SHORT.to_string(),
            )),
            None => Err(InformError::IncompletePacket(ERR_STREAM_ENDED.to_string())),
        }
    }
}
