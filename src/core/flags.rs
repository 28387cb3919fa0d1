//! Packet flag bits carried in the 16-bit flags header field.

use serde::{Serialize, Serializer};
use std::fmt;

bitflags::bitflags! {
    /// Processing steps applied to the payload before it was sent.
    ///
    /// Bits are independent. Any combination parses; the payload pipeline
    /// decides which combinations it can undo.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PacketFlags: u16 {
        /// Payload is AES-128-CBC encrypted with PKCS7 padding
        const ENCRYPTED = 0x0001;

        /// Payload is compressed with the legacy scheme (not supported)
        const COMPRESSED = 0x0002;

        /// Payload is Snappy compressed
        const SNAPPY_COMPRESSED = 0x0004;
    }
}

impl PacketFlags {
    /// Build flags from the wire value, keeping bits this crate has no name for.
    pub fn from_wire(raw: u16) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Names of the known flags that are set, in pipeline order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for PacketFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        bitflags::parser::to_writer(self, f)
    }
}

impl Serialize for PacketFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bits_are_retained() {
        let flags = PacketFlags::from_wire(0x8005);
        assert!(flags.contains(PacketFlags::ENCRYPTED));
        assert!(flags.contains(PacketFlags::SNAPPY_COMPRESSED));
        assert!(!flags.contains(PacketFlags::COMPRESSED));
        assert_eq!(flags.bits(), 0x8005);
    }

    #[test]
    fn test_names_in_bit_order() {
        let flags = PacketFlags::SNAPPY_COMPRESSED | PacketFlags::ENCRYPTED;
        assert_eq!(flags.names(), vec!["ENCRYPTED", "SNAPPY_COMPRESSED"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(PacketFlags::empty().to_string(), "none");
        assert_eq!(PacketFlags::ENCRYPTED.to_string(), "ENCRYPTED");
    }
}
