use std::convert::TryFrom;

use byteorder::{BigEndian, ByteOrder};
use spacelink_core::constants::{APID_IDLE, PRIMARY_HEADER_OCTETS};
use spacelink_core::error::{ErrorKind, Result};
use spacelink_codec::{BitReader, BitWriter, DataField, Field, Flag};

/// Segmentation state carried by the two sequence-flag bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SequenceFlags {
    /// The packet holds a continuation segment of user data.
    Continuation = 0b00,
    /// The packet holds the first segment of user data.
    First = 0b01,
    /// The packet holds the last segment of user data.
    Last = 0b10,
    /// The packet holds unsegmented user data.
    #[default]
    Unsegmented = 0b11,
}

impl SequenceFlags {
    /// Returns the two-bit wire value.
    pub fn to_bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SequenceFlags {
    type Error = ErrorKind;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0b00 => Ok(SequenceFlags::Continuation),
            0b01 => Ok(SequenceFlags::First),
            0b10 => Ok(SequenceFlags::Last),
            0b11 => Ok(SequenceFlags::Unsegmented),
            _ => Err(ErrorKind::MalformedPacket(format!("sequence flags value {}", value))),
        }
    }
}

/// The fixed 48-bit Space Packet primary header.
///
/// Field widths and order are mandated by section 4.1.2 of the protocol:
/// version (3), type (1), secondary header flag (1), APID (11), sequence
/// flags (2), sequence count (14), length (16). The length field stores one
/// fewer than the octet count of the packet data field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimaryHeader {
    /// Packet version number; zero for this revision of the protocol.
    pub version: Field<u8, 3>,
    /// Clear for telemetry, set for telecommand.
    pub packet_type: Flag,
    /// Set iff a secondary header follows the primary header.
    pub sec_hdr_flag: Flag,
    /// Application process identifier; all ones marks an idle packet.
    pub apid: Field<u16, 11>,
    /// Segmentation state of the user data.
    pub sequence_flags: Field<u8, 2>,
    /// Per-APID packet count, modulo 2^14.
    pub sequence_count: Field<u16, 14>,
    /// Octet count of the packet data field, minus one.
    pub length: Field<u16, 16>,
}

impl PrimaryHeader {
    /// Serialized size in octets.
    pub const SIZE_OCTETS: usize = PRIMARY_HEADER_OCTETS;

    /// Returns whether the packet is a telemetry (report) packet.
    pub fn is_telemetry(&self) -> bool {
        !self.packet_type.is_set()
    }

    /// Returns whether the packet is a telecommand (request) packet.
    pub fn is_telecommand(&self) -> bool {
        self.packet_type.is_set()
    }

    /// Returns whether the APID marks this packet as idle.
    pub fn is_idle(&self) -> bool {
        self.apid.value() == APID_IDLE
    }

    /// Marks the packet idle by storing the all-ones APID.
    pub fn set_idle(&mut self) {
        self.apid.set_value(APID_IDLE);
    }

    /// Decodes the two sequence-flag bits.
    pub fn segmentation(&self) -> SequenceFlags {
        // a 2-bit field always decodes
        SequenceFlags::try_from(self.sequence_flags.value()).unwrap_or_default()
    }

    /// Stores the two sequence-flag bits.
    pub fn set_sequence_flags(&mut self, flags: SequenceFlags) {
        self.sequence_flags.set_value(flags.to_bits());
    }

    /// Returns whether the packet carries unsegmented user data.
    pub fn is_unsegmented(&self) -> bool {
        self.segmentation() == SequenceFlags::Unsegmented
    }

    /// Returns whether the packet carries a continuation segment of user
    /// data.
    pub fn is_continuation(&self) -> bool {
        self.segmentation() == SequenceFlags::Continuation
    }

    /// Returns whether the packet carries the first segment of user data.
    pub fn is_first_segment(&self) -> bool {
        self.segmentation() == SequenceFlags::First
    }

    /// Returns whether the packet carries the last segment of user data.
    pub fn is_last_segment(&self) -> bool {
        self.segmentation() == SequenceFlags::Last
    }

    /// Octet count of the packet data field (stored value plus one).
    pub fn length_octets(&self) -> usize {
        self.length.value() as usize + 1
    }

    /// Stores the octet count of the packet data field. The caller must
    /// guarantee `octets >= 1`.
    pub fn set_length_octets(&mut self, octets: usize) {
        debug_assert!(octets >= 1, "packet data field cannot be empty");
        self.length.set_value((octets - 1) as u16);
    }

    /// An idle packet shall not carry a secondary header; everything else
    /// goes.
    pub fn is_valid(&self) -> bool {
        !(self.is_idle() && self.sec_hdr_flag.is_set())
    }

    /// Decodes a primary header directly from the first six octets of
    /// `bytes` without going through a bit cursor.
    ///
    /// This is the fast peek the inbound dispatch path uses; it must agree
    /// bit-for-bit with the [`DataField`] codec path.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE_OCTETS {
            return Err(ErrorKind::PacketTooShort {
                needed: Self::SIZE_OCTETS,
                available: bytes.len(),
            });
        }
        let id_word = BigEndian::read_u16(&bytes[0..2]);
        let sequence_word = BigEndian::read_u16(&bytes[2..4]);
        let length_word = BigEndian::read_u16(&bytes[4..6]);

        let mut header = PrimaryHeader::default();
        header.version.set_value((id_word >> 13) as u8);
        header.packet_type.set_value(((id_word >> 12) & 0x1) as u8);
        header.sec_hdr_flag.set_value(((id_word >> 11) & 0x1) as u8);
        header.apid.set_value(id_word & 0x7FF);
        header.sequence_flags.set_value((sequence_word >> 14) as u8);
        header.sequence_count.set_value(sequence_word & 0x3FFF);
        header.length.set_value(length_word);
        Ok(header)
    }
}

impl DataField for PrimaryHeader {
    const WIDTH_BITS: usize = 48;

    fn serialize(&self, out: &mut BitWriter<'_>) {
        self.version.serialize(out);
        self.packet_type.serialize(out);
        self.sec_hdr_flag.serialize(out);
        self.apid.serialize(out);
        self.sequence_flags.serialize(out);
        self.sequence_count.serialize(out);
        self.length.serialize(out);
    }

    fn deserialize(&mut self, input: &mut BitReader<'_>) {
        self.version.deserialize(input);
        self.packet_type.deserialize(input);
        self.sec_hdr_flag.deserialize(input);
        self.apid.deserialize(input);
        self.sequence_flags.deserialize(input);
        self.sequence_count.deserialize(input);
        self.length.deserialize(input);
    }
}
