//! # Header Codec
//!
//! The inform header is a fixed 40 byte record. Its layout is described once,
//! by [`HEADER_FIELDS`], and the parser walks that schema instead of hard
//! coding offsets:
//!
//! ```text
//! [Magic(4)] [PacketVersion(4)] [MAC(6)] [Flags(2)] [IV(16)] [PayloadVersion(4)] [PayloadLength(4)]
//! ```
//!
//! Multi-byte integers are big-endian. Only the magic is validated; every
//! other field is accepted as sent.

use crate::config::{DEVICE_ID_LEN, IV_LEN, MAGIC_BYTES};
use crate::core::flags::PacketFlags;
use crate::error::{InformError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Names of the header fields, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Magic,
    PacketVersion,
    Mac,
    Flags,
    Iv,
    PayloadVersion,
    PayloadLength,
}

impl HeaderField {
    pub fn name(self) -> &'static str {
        match self {
            HeaderField::Magic => "Magic",
            HeaderField::PacketVersion => "PacketVersion",
            HeaderField::Mac => "MAC",
            HeaderField::Flags => "Flags",
            HeaderField::Iv => "IV",
            HeaderField::PayloadVersion => "PayloadVersion",
            HeaderField::PayloadLength => "PayloadLength",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the header schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: HeaderField,
    pub width: usize,
}

/// Header layout in wire order. This is a wire contract: order and widths are fixed.
pub const HEADER_FIELDS: [FieldSpec; 7] = [
    FieldSpec { field: HeaderField::Magic, width: MAGIC_BYTES.len() },
    FieldSpec { field: HeaderField::PacketVersion, width: 4 },
    FieldSpec { field: HeaderField::Mac, width: DEVICE_ID_LEN },
    FieldSpec { field: HeaderField::Flags, width: 2 },
    FieldSpec { field: HeaderField::Iv, width: IV_LEN },
    FieldSpec { field: HeaderField::PayloadVersion, width: 4 },
    FieldSpec { field: HeaderField::PayloadLength, width: 4 },
];

const fn schema_len(fields: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].width;
        i += 1;
    }
    total
}

/// Total header size in bytes
pub const HEADER_LEN: usize = schema_len(&HEADER_FIELDS);

const _: () = assert!(HEADER_LEN == 40);

/// 6 byte hardware address of the sending device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceId(pub [u8; DEVICE_ID_LEN]);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for DeviceId {
    type Err = InformError;

    /// Accepts `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` or bare hex.
    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        let bytes = hex::decode(&compact)
            .map_err(|e| InformError::ConfigError(format!("Invalid device id '{s}': {e}")))?;
        let addr: [u8; DEVICE_ID_LEN] = bytes.try_into().map_err(|_| {
            InformError::ConfigError(format!("Invalid device id '{s}': expected 6 bytes"))
        })?;
        Ok(DeviceId(addr))
    }
}

impl Serialize for DeviceId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Decoded header fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub packet_version: u32,
    pub device_id: DeviceId,
    pub flags: PacketFlags,
    pub iv: [u8; IV_LEN],
    pub payload_version: u32,
    /// Declared payload length; drives framing only
    pub payload_length: u32,
}

impl Header {
    /// Parse a header buffer.
    ///
    /// # Errors
    /// Returns `InformError::InvalidMagic` if the buffer does not start with `UBNT`.
    pub fn parse(buf: &[u8; HEADER_LEN]) -> Result<Self> {
        let mut header = Header {
            packet_version: 0,
            device_id: DeviceId::default(),
            flags: PacketFlags::empty(),
            iv: [0u8; IV_LEN],
            payload_version: 0,
            payload_length: 0,
        };

        let mut offset = 0;
        for spec in HEADER_FIELDS.iter() {
            let chunk = &buf[offset..offset + spec.width];
            match spec.field {
                HeaderField::Magic => {
                    if chunk != &MAGIC_BYTES[..] {
                        return Err(InformError::InvalidMagic);
                    }
                }
                HeaderField::PacketVersion => header.packet_version = be_uint(chunk) as u32,
                HeaderField::Mac => header.device_id.0.copy_from_slice(chunk),
                HeaderField::Flags => header.flags = PacketFlags::from_wire(be_uint(chunk) as u16),
                HeaderField::Iv => header.iv.copy_from_slice(chunk),
                HeaderField::PayloadVersion => header.payload_version = be_uint(chunk) as u32,
                HeaderField::PayloadLength => header.payload_length = be_uint(chunk) as u32,
            }
            offset += spec.width;
        }

        Ok(header)
    }
}

/// Big-endian unsigned integer from up to 8 bytes
#[inline]
fn be_uint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}
