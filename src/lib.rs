//! # inform-protocol
//!
//! Decoder for the binary "inform" packets network appliances send when
//! phoning home to their management controller.
//!
//! A packet is a fixed 40 byte header followed by a payload whose length the
//! header declares. The payload may be AES-128-CBC encrypted and/or Snappy
//! compressed; the header flags say which.
//!
//! Decoding is two steps:
//! 1. [`Packet::decode`] reads and validates one packet from a byte source
//! 2. [`Packet::resolve_payload`] decrypts and decompresses its payload
//!
//! Both are synchronous, hold no state between calls, and fail without
//! returning partial data. [`InformDecoder`] bundles them with configured
//! limits and key; [`InformCodec`] frames packets off a tokio stream.
//!
//! ## Example
//! ```rust
//! use inform_protocol::Packet;
//!
//! let mut wire = Vec::new();
//! wire.extend_from_slice(b"UBNT");
//! wire.extend_from_slice(&1u32.to_be_bytes());            // packet version
//! wire.extend_from_slice(&[0x00, 0x27, 0x22, 1, 2, 3]);   // device MAC
//! wire.extend_from_slice(&0u16.to_be_bytes());            // flags
//! wire.extend_from_slice(&[0u8; 16]);                     // IV
//! wire.extend_from_slice(&1u32.to_be_bytes());            // payload version
//! wire.extend_from_slice(&5u32.to_be_bytes());            // payload length
//! wire.extend_from_slice(b"hello");
//!
//! let packet = Packet::from_bytes(&wire).unwrap();
//! assert_eq!(packet.device_id.to_string(), "00:27:22:01:02:03");
//! assert_eq!(packet.resolve_payload(&[]).unwrap(), b"hello");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::core::codec::InformCodec;
pub use crate::core::flags::PacketFlags;
pub use crate::core::header::{DeviceId, Header, HEADER_LEN};
pub use crate::core::packet::{Packet, PacketInfo};
pub use crate::core::pipeline::{resolve_payload, InformDecoder};
pub use crate::error::{InformError, Result};
