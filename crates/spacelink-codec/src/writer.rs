use crate::unsigned::UnsignedInt;

fn low_mask(bits: usize) -> u8 {
    ((1u16 << bits) - 1) as u8
}

/// Appends values of arbitrary bit width to an octet buffer.
///
/// The cursor tracks a bit position in `[0, 8 * buffer.len()]` and a sticky
/// bad flag. Any violated precondition (width wider than the carrier,
/// overrunning the buffer, unsupported little-endian shape) sets the flag;
/// from then on every operation is a no-op until [`BitWriter::attach`]
/// re-arms the cursor on a buffer.
///
/// Bits fill each byte MSB-first. A byte is cleared to zero the first time
/// the cursor enters it, so partially written trailing bytes are always
/// zero-padded.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    cursor_bits: usize,
    bad: bool,
}

impl<'a> BitWriter<'a> {
    /// Creates a writer positioned at the start of `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buf: buffer, cursor_bits: 0, bad: false }
    }

    /// Re-arms the writer on a buffer, zeroing the position and clearing the
    /// bad flag.
    pub fn attach(&mut self, buffer: &'a mut [u8]) {
        self.buf = buffer;
        self.cursor_bits = 0;
        self.bad = false;
    }

    /// Appends the low `width_bits` bits of `value`.
    ///
    /// `width_bits == 0` is a no-op. A width wider than the carrier type or
    /// the remaining buffer capacity sets the bad flag without touching the
    /// buffer. Little-endian mode emits whole bytes LSB-first and requires
    /// an octet-multiple width; bit order inside each byte is unchanged.
    pub fn put<U: UnsignedInt>(&mut self, value: U, width_bits: usize, little_endian: bool) {
        if self.bad || width_bits == 0 {
            return;
        }
        if width_bits > U::BITS || width_bits > self.buf.len() * 8 - self.cursor_bits {
            self.bad = true;
            return;
        }
        if little_endian {
            if width_bits % 8 != 0 {
                self.bad = true;
                return;
            }
            let bits = value.to_bits();
            for i in 0..width_bits / 8 {
                self.put_bits_msb((bits >> (8 * i)) & 0xFF, 8);
            }
        } else {
            self.put_bits_msb(value.to_bits(), width_bits);
        }
    }

    /// Appends a whole unsigned value, big-endian.
    ///
    /// Equivalent to `put(value, 8 * size_of::<U>(), false)`.
    pub fn put_unsigned<U: UnsignedInt>(&mut self, value: U) {
        self.put(value, U::BITS, false);
    }

    /// Appends every bit written so far into `other` onto this stream.
    ///
    /// Whole bytes are copied byte-at-a-time; a trailing partial byte is
    /// appended with a single residue `put` of its high bits. Appending a
    /// stream to itself cannot be expressed (the borrows alias).
    pub fn append(&mut self, other: &BitWriter<'_>) {
        let full_bytes = other.cursor_bits / 8;
        let residue_bits = other.cursor_bits % 8;
        for i in 0..full_bytes {
            self.put(other.buf[i], 8, false);
        }
        if residue_bits > 0 {
            self.put(other.buf[full_bytes] >> (8 - residue_bits), residue_bits, false);
        }
    }

    /// Repositions the cursor to an absolute bit offset.
    ///
    /// Used by the packet layer to rewrite header octets in place after the
    /// user data is known. Seeking past the buffer capacity sets the bad
    /// flag.
    pub fn seek_bits(&mut self, position_bits: usize) {
        if self.bad {
            return;
        }
        if position_bits > self.buf.len() * 8 {
            self.bad = true;
            return;
        }
        self.cursor_bits = position_bits;
    }

    // Precondition: width <= 64 and the buffer holds the cursor + width.
    fn put_bits_msb(&mut self, value: u64, mut width: usize) {
        while width > 0 {
            let byte_index = self.cursor_bits / 8;
            let bits_free = 8 - self.cursor_bits % 8;

            // entering a fresh byte clears it so sub-byte writes can OR in
            if self.cursor_bits % 8 == 0 {
                self.buf[byte_index] = 0;
            }

            let take = bits_free.min(width);
            let chunk = ((value >> (width - take)) as u8) & low_mask(take);
            self.buf[byte_index] |= chunk << (bits_free - take);

            width -= take;
            self.cursor_bits += take;
        }
    }

    /// Current cursor position in bits.
    pub fn position_bits(&self) -> usize {
        self.cursor_bits
    }

    /// Octets covered by the cursor, rounding a partial byte up.
    pub fn size_bytes(&self) -> usize {
        self.cursor_bits / 8 + usize::from(self.cursor_bits % 8 > 0)
    }

    /// Total capacity of the attached buffer in octets.
    pub fn capacity_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Returns whether a violated precondition has poisoned the stream.
    pub fn is_bad(&self) -> bool {
        self.bad
    }

    /// The written prefix of the buffer, up to [`BitWriter::size_bytes`].
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.size_bytes()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_fill_msb_first() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0b101u8, 3, false);
        writer.put(0b1u8, 1, false);
        writer.put(0b0110u8, 4, false);
        assert!(!writer.is_bad());
        assert_eq!(writer.position_bits(), 8);
        assert_eq!(writer.size_bytes(), 1);
        assert_eq!(buf[0], 0b1011_0110);
    }

    #[test]
    fn test_value_straddles_byte_boundary() {
        let mut buf = [0u8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0x7FFu16, 11, false);
        writer.put(0u8, 5, false);
        assert_eq!(buf, [0xFF, 0xE0, 0x00]);
    }

    #[test]
    fn test_masks_to_width() {
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        // only the low 4 bits of the value are significant
        writer.put(0xABu8, 4, false);
        writer.put(0u8, 4, false);
        assert_eq!(buf[0], 0xB0);
    }

    #[test]
    fn test_zero_width_is_noop() {
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0xFFu8, 0, false);
        assert!(!writer.is_bad());
        assert_eq!(writer.position_bits(), 0);
    }

    #[test]
    fn test_overrun_sets_bad_and_preserves_buffer() {
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0xAAu8, 8, false);
        writer.put(0x1u8, 1, false);
        assert!(writer.is_bad());
        assert_eq!(writer.position_bits(), 8);
        assert_eq!(buf[0], 0xAA);
    }

    #[test]
    fn test_width_wider_than_carrier_sets_bad() {
        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0u8, 9, false);
        assert!(writer.is_bad());
    }

    #[test]
    fn test_bad_is_sticky_until_attach() {
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0u8, 9, false);
        assert!(writer.is_bad());
        writer.put(0xFFu8, 8, false);
        assert_eq!(writer.position_bits(), 0);

        let mut other = [0u8; 1];
        writer.attach(&mut other);
        assert!(!writer.is_bad());
        writer.put(0xFFu8, 8, false);
        assert_eq!(writer.written(), &[0xFF]);
    }

    #[test]
    fn test_little_endian_reverses_whole_bytes() {
        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0x1122_3344u32, 32, true);
        assert_eq!(buf, [0x44, 0x33, 0x22, 0x11]);
    }

    #[test]
    fn test_little_endian_sub_byte_width_sets_bad() {
        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0x3u8, 3, true);
        assert!(writer.is_bad());
        assert_eq!(buf, [0u8; 4]);
    }

    #[test]
    fn test_put_unsigned_is_whole_width_big_endian() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.put_unsigned(0xBEEFu16);
        assert_eq!(buf, [0xBE, 0xEF]);
    }

    #[test]
    fn test_append_whole_and_residue_bits() {
        let mut sub_buf = [0u8; 2];
        let mut sub = BitWriter::new(&mut sub_buf);
        sub.put(0xABu8, 8, false);
        sub.put(0b110u8, 3, false);

        let mut buf = [0u8; 4];
        let mut writer = BitWriter::new(&mut buf);
        writer.put(0xFu8, 4, false);
        writer.append(&sub);
        assert!(!writer.is_bad());
        assert_eq!(writer.position_bits(), 4 + 11);
        // 1111 10101011 110 -> F A B C (padded)
        assert_eq!(writer.written(), &[0xFA, 0xBC]);
    }

    #[test]
    fn test_append_empty_stream_is_noop() {
        let mut sub_buf = [0u8; 1];
        let sub = BitWriter::new(&mut sub_buf);

        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.append(&sub);
        assert!(!writer.is_bad());
        assert_eq!(writer.position_bits(), 0);
    }

    #[test]
    fn test_seek_and_rewrite_clears_target_bytes() {
        let mut buf = [0u8; 3];
        let mut writer = BitWriter::new(&mut buf);
        writer.put_unsigned(0x11u8);
        writer.put_unsigned(0x22u8);
        writer.put_unsigned(0x33u8);
        writer.seek_bits(0);
        writer.put_unsigned(0xAAu8);
        writer.seek_bits(24);
        assert_eq!(buf, [0xAA, 0x22, 0x33]);
    }

    #[test]
    fn test_seek_past_capacity_sets_bad() {
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        writer.seek_bits(17);
        assert!(writer.is_bad());
    }
}
