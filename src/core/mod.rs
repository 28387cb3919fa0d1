//! # Core Protocol Components
//!
//! Packet framing, header parsing and payload resolution.
//!
//! ## Components
//! - **Header**: Fixed 40 byte header, parsed from a static field schema
//! - **Flags**: Typed bitset for the payload processing flags
//! - **Packet**: Reads header plus length-prefixed payload from a byte source
//! - **Codec**: Tokio codec for packets arriving over a stream
//! - **Pipeline**: Decrypts and decompresses payloads as flagged
//!
//! ## Wire Format
//! ```text
//! [Magic "UBNT"(4)] [PacketVersion(4)] [MAC(6)] [Flags(2)] [IV(16)]
//! [PayloadVersion(4)] [PayloadLength(4)] [Payload(PayloadLength)]
//! ```
//!
//! ## Security
//! - Declared payload length is capped before allocation (16MB default)
//! - Zero length payloads are rejected as incomplete
//! - Nothing is returned on failure: no partial packets, no partial payloads

pub mod codec;
pub mod flags;
pub mod header;
pub mod packet;
pub mod pipeline;
