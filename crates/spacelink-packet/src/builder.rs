use spacelink_core::constants::{PACKET_MAX_OCTETS, PACKET_MIN_OCTETS, PRIMARY_HEADER_OCTETS};
use spacelink_core::error::{ErrorKind, Result};
use spacelink_codec::{BitWriter, DataField};

use crate::primary_header::PrimaryHeader;
use crate::secondary_header::SpSecondaryHeader;

/// A completed or completable Space Packet the transfer service can
/// transmit: stamp the sequence count, finalize the headers, validate, and
/// hand the octets on.
pub trait SpPacket {
    /// Borrows the primary header.
    fn primary(&self) -> &PrimaryHeader;

    /// Mutably borrows the primary header.
    fn primary_mut(&mut self) -> &mut PrimaryHeader;

    /// Writes the headers in front of the accumulated packet data.
    fn finalize(&mut self);

    /// Checks the packet against the protocol shall-statements.
    fn is_valid(&self) -> bool;

    /// The finished packet octets, headers included.
    fn as_bytes(&self) -> &[u8];
}

/// Assembles one Space Packet into a caller-owned buffer.
///
/// The buffer is carved into `[primary | secondary | user data]`; the
/// builder reserves the header octets and exposes a [`BitWriter`] positioned
/// at the user-data region. Header fields live as typed values on the
/// builder and reach the buffer only when [`SpBuilder::finalize`] runs, so
/// they can be edited at any point while data is streamed.
#[derive(Debug)]
pub struct SpBuilder<'a, S: SpSecondaryHeader> {
    /// Primary header fields, serialized on finalize.
    pub primary: PrimaryHeader,
    /// Secondary header fields, serialized on finalize.
    pub secondary: S,
    writer: BitWriter<'a>,
}

impl<'a, S: SpSecondaryHeader> SpBuilder<'a, S> {
    /// Octets reserved in front of the user data.
    pub const HEADER_OCTETS: usize = PRIMARY_HEADER_OCTETS + S::SIZE_OCTETS;

    /// Creates a builder over `buffer`, whose length is the projected total
    /// packet size. Fails if the buffer cannot hold the headers.
    pub fn new(buffer: &'a mut [u8]) -> Result<Self> {
        if buffer.len() < Self::HEADER_OCTETS {
            return Err(ErrorKind::BufferTooSmall {
                needed: Self::HEADER_OCTETS,
                available: buffer.len(),
            });
        }
        let mut writer = BitWriter::new(buffer);
        writer.seek_bits(Self::HEADER_OCTETS * 8);
        Ok(Self { primary: PrimaryHeader::default(), secondary: S::default(), writer })
    }

    /// The user-data stream. Fields, field tuples, or raw unsigned values
    /// written here land after the header region.
    pub fn data(&mut self) -> &mut BitWriter<'a> {
        &mut self.writer
    }

    /// Bits of user data streamed so far.
    pub fn user_data_bits(&self) -> usize {
        self.writer.position_bits().saturating_sub(Self::HEADER_OCTETS * 8)
    }

    /// Octets of user data streamed so far, rounding a partial byte up.
    pub fn user_data_octets(&self) -> usize {
        self.writer.size_bytes().saturating_sub(Self::HEADER_OCTETS)
    }

    /// Total packet size in octets: headers plus user data.
    pub fn size(&self) -> usize {
        Self::HEADER_OCTETS + self.user_data_octets()
    }

    /// Completes the packet: sets the secondary-header flag from the
    /// packet shape, stores the data-field length (secondary plus user
    /// octets, minus one), and serializes both headers at the start of the
    /// buffer. Idempotent while the builder state is unchanged.
    pub fn finalize(&mut self) {
        if S::SIZE_OCTETS > 0 {
            self.primary.sec_hdr_flag.set();
        } else {
            self.primary.sec_hdr_flag.reset();
        }

        let data_field_octets = S::SIZE_OCTETS + self.user_data_octets();
        if data_field_octets > 0 {
            self.primary.set_length_octets(data_field_octets);
        }

        let resume = self.writer.position_bits();
        self.writer.seek_bits(0);
        self.primary.serialize(&mut self.writer);
        self.secondary.serialize(&mut self.writer);
        self.writer.seek_bits(resume);
    }

    /// Checks the packet against the protocol shall-statements: some packet
    /// data must exist, user data must cover whole octets, the total size
    /// must stay within protocol bounds, and the header fields must be
    /// consistent with the packet shape.
    pub fn is_valid(&self) -> bool {
        if self.writer.is_bad() {
            return false;
        }
        let user_octets = self.user_data_octets();
        (S::SIZE_OCTETS > 0 || user_octets > 0)
            && self.user_data_bits() % 8 == 0
            && (PACKET_MIN_OCTETS..=PACKET_MAX_OCTETS).contains(&self.size())
            && self.primary.sec_hdr_flag.is_set() == (S::SIZE_OCTETS > 0)
            && !(self.primary.is_idle() && S::SIZE_OCTETS > 0)
            && self.primary.length_octets() == S::SIZE_OCTETS + user_octets
            && self.primary.is_valid()
    }

    /// The packet octets written so far. Meaningful once
    /// [`SpBuilder::finalize`] has run.
    pub fn as_bytes(&self) -> &[u8] {
        self.writer.written()
    }
}

impl<'a, S: SpSecondaryHeader> SpPacket for SpBuilder<'a, S> {
    fn primary(&self) -> &PrimaryHeader {
        &self.primary
    }

    fn primary_mut(&mut self) -> &mut PrimaryHeader {
        &mut self.primary
    }

    fn finalize(&mut self) {
        SpBuilder::finalize(self);
    }

    fn is_valid(&self) -> bool {
        SpBuilder::is_valid(self)
    }

    fn as_bytes(&self) -> &[u8] {
        SpBuilder::as_bytes(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primary_header::SequenceFlags;
    use crate::secondary_header::{EmptySecondaryHeader, SecondaryHeader};
    use spacelink_codec::Field;

    type AncillaryHeader = SecondaryHeader<(), Field<u32, 32>>;

    #[test]
    fn test_minimal_telemetry_packet() {
        let mut buf = [0u8; 7];
        let mut packet = SpBuilder::<EmptySecondaryHeader>::new(&mut buf).unwrap();
        packet.primary.apid.set_value(0x002);
        packet.primary.set_sequence_flags(SequenceFlags::Unsegmented);
        packet.data().put_unsigned(0xABu8);
        packet.finalize();

        assert!(packet.is_valid());
        assert_eq!(packet.size(), 7);
        assert_eq!(packet.as_bytes(), &[0x00, 0x02, 0xC0, 0x00, 0x00, 0x00, 0xAB]);
    }

    #[test]
    fn test_packet_with_ancillary_secondary_header() {
        let mut buf = [0u8; 22];
        let mut packet = SpBuilder::<AncillaryHeader>::new(&mut buf).unwrap();
        packet.primary.apid.set_value(0x01F);
        packet.primary.set_sequence_flags(SequenceFlags::Unsegmented);
        packet.secondary.ancillary.set_value(0x1999_9991);
        packet.data().put_unsigned(0xEEEE_CCCC_B000_000Bu64);
        packet.data().put_unsigned(0xFAAA_AAAFu32);
        packet.finalize();

        assert!(packet.is_valid());
        assert_eq!(packet.primary.length_octets(), 16);
        assert_eq!(
            packet.as_bytes(),
            &[
                0x08, 0x1F, 0xC0, 0x00, 0x00, 0x0F, 0x19, 0x99, 0x99, 0x91, 0xEE, 0xEE, 0xCC,
                0xCC, 0xB0, 0x00, 0x00, 0x0B, 0xFA, 0xAA, 0xAA, 0xAF
            ]
        );
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut buf = [0u8; 8];
        let mut packet = SpBuilder::<EmptySecondaryHeader>::new(&mut buf).unwrap();
        packet.data().put_unsigned(0x1234u16);
        packet.finalize();
        let first: Vec<u8> = packet.as_bytes().to_vec();
        packet.finalize();
        assert_eq!(packet.as_bytes(), first.as_slice());
    }

    #[test]
    fn test_empty_packet_is_invalid() {
        let mut buf = [0u8; 6];
        let mut packet = SpBuilder::<EmptySecondaryHeader>::new(&mut buf).unwrap();
        packet.finalize();
        assert!(!packet.is_valid());
    }

    #[test]
    fn test_secondary_header_alone_is_valid() {
        let mut buf = [0u8; 10];
        let mut packet = SpBuilder::<AncillaryHeader>::new(&mut buf).unwrap();
        packet.secondary.ancillary.set_value(42);
        packet.finalize();
        assert!(packet.is_valid());
        assert_eq!(packet.primary.length_octets(), 4);
        assert!(packet.primary.sec_hdr_flag.is_set());
    }

    #[test]
    fn test_fractional_user_octet_is_invalid() {
        let mut buf = [0u8; 8];
        let mut packet = SpBuilder::<EmptySecondaryHeader>::new(&mut buf).unwrap();
        packet.data().put(0b101u8, 3, false);
        packet.finalize();
        assert!(!packet.is_valid());
    }

    #[test]
    fn test_idle_with_secondary_header_is_invalid() {
        let mut buf = [0u8; 12];
        let mut packet = SpBuilder::<AncillaryHeader>::new(&mut buf).unwrap();
        packet.primary.set_idle();
        packet.data().put_unsigned(0u8);
        packet.finalize();
        assert!(!packet.is_valid());
    }

    #[test]
    fn test_buffer_too_small_for_headers() {
        let mut buf = [0u8; 9];
        let err = SpBuilder::<AncillaryHeader>::new(&mut buf).unwrap_err();
        assert_eq!(err, ErrorKind::BufferTooSmall { needed: 10, available: 9 });
    }

    #[test]
    fn test_overlong_user_data_poisons_builder() {
        let mut buf = [0u8; 7];
        let mut packet = SpBuilder::<EmptySecondaryHeader>::new(&mut buf).unwrap();
        packet.data().put_unsigned(0xFFu8);
        packet.data().put_unsigned(0xFFu8);
        packet.finalize();
        assert!(!packet.is_valid());
    }
}
