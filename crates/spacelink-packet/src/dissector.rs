use spacelink_core::constants::PRIMARY_HEADER_OCTETS;
use spacelink_core::error::{ErrorKind, Result};
use spacelink_codec::{BitReader, BitWriter, DataField};

use crate::primary_header::PrimaryHeader;
use crate::secondary_header::SpSecondaryHeader;

/// A fully typed Space Packet schema: headers plus a tuple of user-data
/// fields whose shape is fixed at compile time.
///
/// The field tuple must cover whole octets, and the packet data field must
/// be non-empty (typed fields, a secondary header, or both). Field access
/// goes through the public `fields` tuple, so member indexing is checked at
/// compile time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpDissector<S: SpSecondaryHeader, F: DataField + Default> {
    /// Primary header fields.
    pub primary: PrimaryHeader,
    /// Secondary header fields.
    pub secondary: S,
    /// The typed user-data fields, serialized in declaration order.
    pub fields: F,
}

impl<S: SpSecondaryHeader, F: DataField + Default> SpDissector<S, F> {
    const SHAPE_OK: () = assert!(
        F::WIDTH_BITS % 8 == 0 && (F::WIDTH_BITS > 0 || S::SIZE_OCTETS > 0),
        "dissector fields must cover whole octets and the packet data field cannot be empty"
    );

    /// Octets covered by the typed user-data fields.
    pub const USER_DATA_OCTETS: usize = F::WIDTH_BITS / 8;

    /// Total packet size in octets.
    pub const PACKET_OCTETS: usize =
        PRIMARY_HEADER_OCTETS + S::SIZE_OCTETS + F::WIDTH_BITS / 8;

    /// Creates a dissector with defaulted headers and fields.
    pub fn new() -> Self {
        let _ = Self::SHAPE_OK;
        Self::default()
    }

    /// Deserializes headers then fields from a received packet.
    pub fn from_bytes(buffer: &[u8]) -> Result<Self> {
        let _ = Self::SHAPE_OK;
        if buffer.len() < Self::PACKET_OCTETS {
            return Err(ErrorKind::PacketTooShort {
                needed: Self::PACKET_OCTETS,
                available: buffer.len(),
            });
        }
        let mut dissector = Self::default();
        let mut reader = BitReader::new(buffer);
        dissector.primary.deserialize(&mut reader);
        dissector.secondary.deserialize(&mut reader);
        dissector.fields.deserialize(&mut reader);
        Ok(dissector)
    }

    /// Completes the headers from the compile-time packet shape: secondary
    /// flag, and data-field length (secondary plus typed-field octets,
    /// minus one).
    pub fn finalize(&mut self) {
        if S::SIZE_OCTETS > 0 {
            self.primary.sec_hdr_flag.set();
        } else {
            self.primary.sec_hdr_flag.reset();
        }
        self.primary.set_length_octets(S::SIZE_OCTETS + Self::USER_DATA_OCTETS);
    }

    /// Finalizes, then serializes headers and fields into `buffer`.
    /// Returns the packet size in octets.
    pub fn to_bytes(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if buffer.len() < Self::PACKET_OCTETS {
            return Err(ErrorKind::BufferTooSmall {
                needed: Self::PACKET_OCTETS,
                available: buffer.len(),
            });
        }
        self.finalize();
        let mut writer = BitWriter::new(buffer);
        self.primary.serialize(&mut writer);
        self.secondary.serialize(&mut writer);
        self.fields.serialize(&mut writer);
        Ok(Self::PACKET_OCTETS)
    }

    /// Checks the finalized packet against the protocol shall-statements.
    pub fn is_valid(&self) -> bool {
        self.primary.sec_hdr_flag.is_set() == (S::SIZE_OCTETS > 0)
            && !(self.primary.is_idle() && S::SIZE_OCTETS > 0)
            && self.primary.length_octets() == S::SIZE_OCTETS + Self::USER_DATA_OCTETS
            && self.primary.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secondary_header::{EmptySecondaryHeader, SecondaryHeader};
    use spacelink_codec::{Field, Flag};

    // 64 + 4 + 4x1 + 24 + 8 = 104 bits = 13 octets of user data
    type Schema = (
        Field<u64, 64>,
        Field<u8, 4>,
        Flag,
        Flag,
        Flag,
        Flag,
        Field<u32, 24>,
        Field<u8, 8>,
    );
    type Dissector = SpDissector<EmptySecondaryHeader, Schema>;

    #[test]
    fn test_packet_size_from_schema() {
        assert_eq!(Dissector::USER_DATA_OCTETS, 13);
        assert_eq!(Dissector::PACKET_OCTETS, 19);

        type WithAncillary = SpDissector<SecondaryHeader<(), Field<u16, 16>>, Schema>;
        assert_eq!(WithAncillary::PACKET_OCTETS, 21);
    }

    #[test]
    fn test_typed_roundtrip() {
        let mut original = Dissector::new();
        original.primary.apid.set_value(0x155);
        original.fields.0.set_value(0xDEAD_BEEF_CAFE_F00D);
        original.fields.1.set_value(0x9);
        original.fields.2.set();
        original.fields.4.set();
        original.fields.6.set_value(0xABCDEF);
        original.fields.7.set_value(0x42);

        let mut buf = [0u8; Dissector::PACKET_OCTETS];
        let written = original.to_bytes(&mut buf).unwrap();
        assert_eq!(written, Dissector::PACKET_OCTETS);
        assert!(original.is_valid());
        assert_eq!(original.primary.length_octets(), 13);

        let decoded = Dissector::from_bytes(&buf).unwrap();
        assert_eq!(decoded, original);

        // re-serializing the decoded packet reproduces the buffer
        let mut decoded = decoded;
        let mut second = [0u8; Dissector::PACKET_OCTETS];
        decoded.to_bytes(&mut second).unwrap();
        assert_eq!(second, buf);
    }

    #[test]
    fn test_from_bytes_rejects_short_buffer() {
        let buf = [0u8; Dissector::PACKET_OCTETS - 1];
        let err = Dissector::from_bytes(&buf).unwrap_err();
        assert_eq!(err, ErrorKind::PacketTooShort { needed: 19, available: 18 });
    }

    #[test]
    fn test_to_bytes_rejects_short_buffer() {
        let mut dissector = Dissector::new();
        let mut buf = [0u8; 10];
        let err = dissector.to_bytes(&mut buf).unwrap_err();
        assert_eq!(err, ErrorKind::BufferTooSmall { needed: 19, available: 10 });
    }

    #[test]
    fn test_finalize_sets_flag_and_length() {
        type WithAncillary = SpDissector<SecondaryHeader<(), Field<u32, 32>>, (Field<u16, 16>,)>;
        let mut dissector = WithAncillary::new();
        dissector.finalize();
        assert!(dissector.primary.sec_hdr_flag.is_set());
        assert_eq!(dissector.primary.length_octets(), 6);
        assert!(dissector.is_valid());
    }
}
