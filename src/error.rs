//! # Error Types
//!
//! Every failure the inform decoder can report.
//!
//! Decoding never retries and never returns partial results: each variant
//! below is terminal for the decode or resolve call that produced it. The
//! kinds are kept distinct so callers can pick their own policy, e.g. drop
//! the connection on [`InformError::InvalidMagic`] but wait for more bytes
//! on [`InformError::IncompletePacket`].
//!
//! ## Error Categories
//! - **Framing**: bad magic, truncated header or payload, oversized length
//! - **Cryptographic**: wrong key or IV size, broken PKCS7 padding
//! - **Processing**: unsupported compression flag, Snappy failures
//! - **Ambient**: I/O plumbing and configuration
//!
//! ## Example Usage
//! ```rust
//! use inform_protocol::error::InformError;
//! use inform_protocol::Packet;
//!
//! let bogus = b"HTTP/1.1 200 OK\r\n\r\n--------------------------";
//! match Packet::from_bytes(bogus) {
//!     Err(InformError::InvalidMagic) => { /* not an inform packet */ }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Reason strings shared by the decoder and its callers.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Framing errors
    pub const ERR_HEADER_TOO_SHORT: &str = "header too short";
    pub const ERR_NO_PAYLOAD_LENGTH: &str = "header does not define payload length";
    pub const ERR_STREAM_ENDED: &str = "stream ended inside a packet";

    /// PKCS7 padding errors
    pub const ERR_PADDING_NO_DATA: &str = "no data";
    pub const ERR_PADDING_NOT_PADDED: &str = "data is not padded";
    pub const ERR_PADDING_STRUCTURE: &str = "structure invalid";

    /// Flag names reported by `UnsupportedFlag`
    pub const FLAG_COMPRESSED: &str = "compressed";

    /// Decompression errors
    pub const ERR_TRAILER_MISSING: &str = "payload shorter than snappy trailer";
    pub const ERR_DECOMPRESSED_TOO_LARGE: &str = "decompressed size exceeds limit";
}

/// InformError is the error type for every decode and resolve operation
#[derive(Error, Debug)]
pub enum InformError {
    #[error("Invalid magic: packet does not start with \"UBNT\"")]
    InvalidMagic,

    #[error("Incomplete packet: {0}")]
    IncompletePacket(String),

    #[error("Packet too large: {declared} bytes declared, limit is {limit}")]
    OversizedPacket { declared: usize, limit: usize },

    #[error("Invalid key: AES-128 requires a 16 byte key")]
    InvalidKey,

    #[error("Invalid IV: expected 16 bytes, got {0}")]
    InvalidIv(usize),

    #[error("Invalid padding: {0}")]
    InvalidPadding(&'static str),

    #[error("Unsupported flag: {0}")]
    UnsupportedFlag(&'static str),

    #[error("Decompression failed: {0}")]
    DecompressionFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl InformError {
    /// Whether more input could turn this failure into a success.
    ///
    /// Only truncation qualifies; every other kind is a property of the
    /// bytes already seen.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, InformError::IncompletePacket(_))
    }
}

/// Type alias for Results using InformError
pub type Result<T> = std::result::Result<T, InformError>;
