//! # Payload Pipeline
//!
//! Turns a packet's wire payload into the plaintext the device sent, undoing
//! the steps its flags announce. Flags are checked independently and always
//! in this order:
//!
//! 1. `ENCRYPTED`: AES-128-CBC decrypt with the packet IV, then PKCS7 unpad
//! 2. `COMPRESSED`: legacy scheme, always rejected as unsupported
//! 3. `SNAPPY_COMPRESSED`: strip the 10 byte trailer, Snappy decompress
//!
//! A packet with none of these flags resolves to its raw payload. Every
//! failure, decompression included, is returned to the caller.

use crate::config::{DecoderConfig, MAX_DECOMPRESSED_SIZE};
use crate::core::codec::InformCodec;
use crate::core::flags::PacketFlags;
use crate::core::packet::Packet;
use crate::error::constants::FLAG_COMPRESSED;
use crate::error::{InformError, Result};
use crate::utils::compression::decompress_snappy;
use crate::utils::crypto::decrypt;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use tokio::io::AsyncRead;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

/// Resolve the payload of `packet` with the default decompression limit.
pub fn resolve_payload(packet: &Packet, key: &[u8]) -> Result<Vec<u8>> {
    resolve_payload_with_limit(packet, key, MAX_DECOMPRESSED_SIZE)
}

/// Resolve the payload of `packet`, capping Snappy output at `max_decompressed`.
///
/// `key` is only used when the packet is encrypted.
///
/// # Errors
/// - Decryption errors (`InvalidKey`, `InvalidPadding`) when `ENCRYPTED` is set
/// - `InformError::UnsupportedFlag("compressed")` when `COMPRESSED` is set
/// - `InformError::DecompressionFailure` when `SNAPPY_COMPRESSED` is set and
///   the payload cannot be decompressed
#[instrument(level = "debug", skip_all, fields(device = %packet.device_id, flags = %packet.flags))]
pub fn resolve_payload_with_limit(
    packet: &Packet,
    key: &[u8],
    max_decompressed: usize,
) -> Result<Vec<u8>> {
    let mut result = Cow::Borrowed(packet.payload.as_slice());

    if packet.flags.contains(PacketFlags::ENCRYPTED) {
        result = Cow::Owned(decrypt(key, &packet.iv, &result)?);
    }

    if packet.flags.contains(PacketFlags::COMPRESSED) {
        return Err(InformError::UnsupportedFlag(FLAG_COMPRESSED));
    }

    if packet.flags.contains(PacketFlags::SNAPPY_COMPRESSED) {
        result = Cow::Owned(decompress_snappy(&result, max_decompressed)?);
    }

    debug!(len = result.len(), "Resolved payload");
    Ok(result.into_owned())
}

/// Decoder bound to a [`DecoderConfig`]: size limits plus the authkey.
pub struct InformDecoder {
    config: DecoderConfig,
    key: Zeroizing<Vec<u8>>,
}

impl InformDecoder {
    /// Build a decoder using the key from `config` (or the factory default key).
    pub fn new(config: DecoderConfig) -> Result<Self> {
        let key = config.key()?;
        Ok(Self { config, key })
    }

    /// Build a decoder with an explicit key, ignoring `config.authkey`.
    pub fn with_key(config: DecoderConfig, key: &[u8]) -> Result<Self> {
        if key.len() != crate::config::AES_KEY_LEN {
            return Err(InformError::InvalidKey);
        }
        Ok(Self {
            config,
            key: Zeroizing::new(key.to_vec()),
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Read one packet, honouring the configured payload limit.
    pub fn decode<R: Read>(&self, reader: R) -> Result<Packet> {
        Packet::decode_with_limit(reader, self.config.max_payload_size)
    }

    /// Async counterpart of [`InformDecoder::decode`].
    pub async fn decode_async<R: AsyncRead + Unpin>(&self, reader: &mut R) -> Result<Packet> {
        Packet::decode_async_with_limit(reader, self.config.max_payload_size).await
    }

    /// Resolve a packet's payload with the configured key and limits.
    pub fn resolve(&self, packet: &Packet) -> Result<Vec<u8>> {
        resolve_payload_with_limit(packet, &self.key, self.config.max_decompressed_size)
    }

    /// Read one packet and resolve its payload.
    pub fn decode_and_resolve<R: Read>(&self, reader: R) -> Result<(Packet, Vec<u8>)> {
        let packet = self.decode(reader)?;
        let payload = self.resolve(&packet)?;
        Ok((packet, payload))
    }

    /// Stream codec sharing this decoder's payload limit.
    pub fn codec(&self) -> InformCodec {
        InformCodec::with_max_payload_size(self.config.max_payload_size)
    }
}

impl fmt::Debug for InformDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InformDecoder")
            .field("max_payload_size", &self.config.max_payload_size)
            .field("max_decompressed_size", &self.config.max_decompressed_size)
            .field("key", &"<redacted>")
            .finish()
    }
}
