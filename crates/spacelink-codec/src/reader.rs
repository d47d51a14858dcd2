use crate::unsigned::UnsignedInt;

fn low_mask(bits: usize) -> u8 {
    ((1u16 << bits) - 1) as u8
}

/// Consumes values of arbitrary bit width from an octet buffer.
///
/// Mirror of [`crate::BitWriter`]: same cursor model, same sticky bad flag,
/// same MSB-first bit order and little-endian whole-byte reversal. Readers
/// never mutate the buffer.
#[derive(Debug)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    cursor_bits: usize,
    bad: bool,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buf: buffer, cursor_bits: 0, bad: false }
    }

    /// Re-arms the reader on a buffer, zeroing the position and clearing the
    /// bad flag.
    pub fn attach(&mut self, buffer: &'a [u8]) {
        self.buf = buffer;
        self.cursor_bits = 0;
        self.bad = false;
    }

    /// Reads `width_bits` bits into the low bits of `out`.
    ///
    /// `width_bits == 0` is a no-op. A width wider than the carrier type or
    /// the remaining buffer sets the bad flag and leaves `out` untouched.
    /// Little-endian mode consumes whole bytes LSB-first and requires an
    /// octet-multiple width.
    pub fn get<U: UnsignedInt>(&mut self, out: &mut U, width_bits: usize, little_endian: bool) {
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
            let mut bits = 0u64;
            for i in 0..width_bits / 8 {
                bits |= self.get_bits_msb(8) << (8 * i);
            }
            *out = U::from_bits(bits);
        } else {
            *out = U::from_bits(self.get_bits_msb(width_bits));
        }
    }

    /// Reads a whole unsigned value, big-endian.
    ///
    /// Equivalent to `get(out, 8 * size_of::<U>(), false)`.
    pub fn get_unsigned<U: UnsignedInt>(&mut self, out: &mut U) {
        self.get(out, U::BITS, false);
    }

    /// Repositions the cursor to an absolute bit offset.
    ///
    /// Seeking past the buffer capacity sets the bad flag.
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
    fn get_bits_msb(&mut self, mut width: usize) -> u64 {
        let mut acc = 0u64;
        while width > 0 {
            let byte_index = self.cursor_bits / 8;
            let bits_left = 8 - self.cursor_bits % 8;

            let take = bits_left.min(width);
            let chunk = (self.buf[byte_index] >> (bits_left - take)) & low_mask(take);
            acc = (acc << take) | u64::from(chunk);

            width -= take;
            self.cursor_bits += take;
        }
        acc
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

    /// Bits left between the cursor and the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.buf.len() * 8 - self.cursor_bits
    }

    /// Returns whether a violated precondition has poisoned the stream.
    pub fn is_bad(&self) -> bool {
        self.bad
    }
}
