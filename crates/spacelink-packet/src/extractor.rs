use spacelink_core::constants::PRIMARY_HEADER_OCTETS;
use spacelink_core::error::{ErrorKind, Result};
use spacelink_codec::{BitReader, DataField};

use crate::primary_header::PrimaryHeader;
use crate::secondary_header::SpSecondaryHeader;

/// Extracts one Space Packet from a received octet string.
///
/// Construction deserializes the primary header and the caller-typed
/// secondary header; the remaining octets are exposed as a positioned
/// [`BitReader`]. Extractors never write to the buffer.
#[derive(Debug)]
pub struct SpExtractor<'a, S: SpSecondaryHeader> {
    /// The decoded primary header.
    pub primary: PrimaryHeader,
    /// The decoded secondary header.
    pub secondary: S,
    reader: BitReader<'a>,
}

impl<'a, S: SpSecondaryHeader> SpExtractor<'a, S> {
    /// Octets consumed by the headers.
    pub const HEADER_OCTETS: usize = PRIMARY_HEADER_OCTETS + S::SIZE_OCTETS;

    /// Parses the headers out of `buffer`, which is presumed to hold exactly
    /// one packet.
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        if buffer.len() < Self::HEADER_OCTETS {
            return Err(ErrorKind::PacketTooShort {
                needed: Self::HEADER_OCTETS,
                available: buffer.len(),
            });
        }
        let mut reader = BitReader::new(buffer);
        let mut primary = PrimaryHeader::default();
        primary.deserialize(&mut reader);
        let mut secondary = S::default();
        secondary.deserialize(&mut reader);
        Ok(Self { primary, secondary, reader })
    }

    /// The user-data stream, positioned just past the headers.
    pub fn data(&mut self) -> &mut BitReader<'a> {
        &mut self.reader
    }

    /// Octets of user data following the headers.
    pub fn user_data_octets(&self) -> usize {
        self.reader.capacity_bytes() - Self::HEADER_OCTETS
    }
}
