use crate::data_field::DataField;
use crate::reader::BitReader;
use crate::unsigned::UnsignedInt;
use crate::writer::BitWriter;

/// A single unsigned value occupying `WIDTH_BITS` bits on the wire.
///
/// The semantic value is the low `WIDTH_BITS` bits of the carrier `T`;
/// setters mask, so a stored value never exceeds the field width. Endianness
/// is part of the type: the default transmits the value MSB-first, while
/// `LITTLE_ENDIAN = true` reverses whole-byte order (and is only legal for
/// octet-multiple widths).
///
/// Ill-shaped fields (zero width, width wider than the carrier, sub-byte
/// little-endian) fail to compile when first used.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Field<T: UnsignedInt, const WIDTH_BITS: usize, const LITTLE_ENDIAN: bool = false> {
    value: T,
}

impl<T: UnsignedInt, const WIDTH_BITS: usize, const LITTLE_ENDIAN: bool>
    Field<T, WIDTH_BITS, LITTLE_ENDIAN>
{
    const SHAPE_OK: () = assert!(
        WIDTH_BITS >= 1
            && WIDTH_BITS <= T::BITS
            && (!LITTLE_ENDIAN || WIDTH_BITS % 8 == 0),
        "field width must be 1..=carrier bits, and little-endian fields whole octets"
    );

    /// Mask selecting the low `WIDTH_BITS` bits of the carrier.
    pub const MASK: u64 = if WIDTH_BITS >= 64 { u64::MAX } else { (1u64 << WIDTH_BITS) - 1 };

    /// Creates a field holding `value`, masked to the field width.
    pub fn new(value: T) -> Self {
        let _ = Self::SHAPE_OK;
        Self { value: T::from_bits(value.to_bits() & Self::MASK) }
    }

    /// Returns the stored value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Stores `value`, masked to the field width.
    pub fn set_value(&mut self, value: T) {
        self.value = T::from_bits(value.to_bits() & Self::MASK);
    }

    /// Reads bit `n` of the value (bit 0 is the LSB). Out-of-range bits read
    /// as false.
    pub fn bit(&self, n: usize) -> bool {
        n < WIDTH_BITS && (self.value.to_bits() >> n) & 1 == 1
    }

    /// Writes bit `n` of the value (bit 0 is the LSB). Out-of-range writes
    /// are ignored.
    pub fn set_bit(&mut self, n: usize, bit: bool) {
        if n >= WIDTH_BITS {
            return;
        }
        let bits = self.value.to_bits();
        let bits = if bit { bits | (1 << n) } else { bits & !(1 << n) };
        self.value = T::from_bits(bits);
    }

    /// Adds one to the value, wrapping modulo `2^WIDTH_BITS`.
    pub fn increment(&mut self) {
        self.value = T::from_bits(self.value.to_bits().wrapping_add(1) & Self::MASK);
    }

    /// Subtracts one from the value, wrapping modulo `2^WIDTH_BITS`.
    pub fn decrement(&mut self) {
        self.value = T::from_bits(self.value.to_bits().wrapping_sub(1) & Self::MASK);
    }
}

impl<T: UnsignedInt, const WIDTH_BITS: usize, const LITTLE_ENDIAN: bool> DataField
    for Field<T, WIDTH_BITS, LITTLE_ENDIAN>
{
    const WIDTH_BITS: usize = WIDTH_BITS;

    fn serialize(&self, out: &mut BitWriter<'_>) {
        let _ = Self::SHAPE_OK;
        out.put(self.value, WIDTH_BITS, LITTLE_ENDIAN);
    }

    fn deserialize(&mut self, input: &mut BitReader<'_>) {
        let _ = Self::SHAPE_OK;
        input.get(&mut self.value, WIDTH_BITS, LITTLE_ENDIAN);
    }
}

/// A one-bit field with boolean accessors.
pub type Flag = Field<u8, 1>;

impl Flag {
    /// Returns whether the flag is raised.
    pub fn is_set(&self) -> bool {
        self.bit(0)
    }

    /// Raises the flag.
    pub fn set(&mut self) {
        self.set_bit(0, true);
    }

    /// Clears the flag.
    pub fn reset(&mut self) {
        self.set_bit(0, false);
    }
}
