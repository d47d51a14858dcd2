use spacelink_core::error::Result;
use spacelink_codec::UnsignedInt;

use crate::builder::{SpBuilder, SpPacket};
use crate::primary_header::{PrimaryHeader, SequenceFlags};
use crate::secondary_header::EmptySecondaryHeader;

/// Assembles an idle Space Packet: all-ones APID, no secondary header, and
/// a user-data field filled with a repeating pattern word.
///
/// The whole user-data region of the buffer is filled at construction:
/// whole pattern words first, then the pattern's high bytes into any
/// leftover octets (big-endian truncation). Sequence flags default to
/// unsegmented; the caller may override them through
/// [`SpIdleBuilder::primary_mut`] before transmitting.
#[derive(Debug)]
pub struct SpIdleBuilder<'a, P: UnsignedInt = u8> {
    builder: SpBuilder<'a, EmptySecondaryHeader>,
    pattern: P,
}

impl<'a, P: UnsignedInt> SpIdleBuilder<'a, P> {
    /// Creates an idle packet filling `buffer` entirely: six header octets
    /// plus `buffer.len() - 6` pattern octets.
    pub fn new(buffer: &'a mut [u8], pattern: P) -> Result<Self> {
        let mut builder = SpBuilder::<EmptySecondaryHeader>::new(buffer)?;
        builder.primary.set_idle();
        builder.primary.set_sequence_flags(SequenceFlags::Unsegmented);

        let pattern_word_octets = P::BITS / 8;
        let fill_octets =
            builder.data().capacity_bytes() - SpBuilder::<EmptySecondaryHeader>::HEADER_OCTETS;
        for _ in 0..fill_octets / pattern_word_octets {
            builder.data().put(pattern, P::BITS, false);
        }
        let residue_octets = fill_octets % pattern_word_octets;
        if residue_octets > 0 {
            let high_bytes = pattern.to_bits() >> (8 * (pattern_word_octets - residue_octets));
            builder.data().put(high_bytes, residue_octets * 8, false);
        }

        Ok(Self { builder, pattern })
    }

    /// The fill pattern word.
    pub fn pattern(&self) -> P {
        self.pattern
    }

    /// Borrows the primary header.
    pub fn primary(&self) -> &PrimaryHeader {
        &self.builder.primary
    }

    /// Mutably borrows the primary header, e.g. to adjust sequence flags.
    pub fn primary_mut(&mut self) -> &mut PrimaryHeader {
        &mut self.builder.primary
    }

    /// Total packet size in octets.
    pub fn size(&self) -> usize {
        self.builder.size()
    }

    /// Writes the headers in front of the fill pattern.
    pub fn finalize(&mut self) {
        self.builder.finalize();
    }

    /// Checks the packet against the protocol shall-statements.
    pub fn is_valid(&self) -> bool {
        self.builder.is_valid()
    }

    /// The packet octets. Meaningful once [`SpIdleBuilder::finalize`] has
    /// run.
    pub fn as_bytes(&self) -> &[u8] {
        self.builder.as_bytes()
    }
}

impl<'a, P: UnsignedInt> SpPacket for SpIdleBuilder<'a, P> {
    fn primary(&self) -> &PrimaryHeader {
        SpIdleBuilder::primary(self)
    }

    fn primary_mut(&mut self) -> &mut PrimaryHeader {
        SpIdleBuilder::primary_mut(self)
    }

    fn finalize(&mut self) {
        SpIdleBuilder::finalize(self);
    }

    fn is_valid(&self) -> bool {
        SpIdleBuilder::is_valid(self)
    }

    fn as_bytes(&self) -> &[u8] {
        SpIdleBuilder::as_bytes(self)
    }
}
