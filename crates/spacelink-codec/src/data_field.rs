use crate::reader::BitReader;
use crate::writer::BitWriter;

/// A value with a statically known bit width that serializes itself through
/// the bit cursors.
///
/// Heterogeneous field groups are plain tuples: `(A, B, C)` serializes its
/// members in declaration order and its width is the sum of theirs. Tuples
/// nest, and the unit type is the empty group (width 0, no I/O), so any
/// packet shape can be composed and checked at compile time.
pub trait DataField {
    /// Total serialized width in bits.
    const WIDTH_BITS: usize;

    /// Writes exactly [`DataField::WIDTH_BITS`] bits to `out`.
    fn serialize(&self, out: &mut BitWriter<'_>);

    /// Reads exactly [`DataField::WIDTH_BITS`] bits from `input`.
    fn deserialize(&mut self, input: &mut BitReader<'_>);
}

impl DataField for () {
    const WIDTH_BITS: usize = 0;

    fn serialize(&self, _out: &mut BitWriter<'_>) {}

    fn deserialize(&mut self, _input: &mut BitReader<'_>) {}
}

macro_rules! impl_data_field_for_tuple {
    ($(($T:ident, $idx:tt)),+) => {
        impl<$($T: DataField),+> DataField for ($($T,)+) {
            const WIDTH_BITS: usize = 0 $(+ $T::WIDTH_BITS)+;

            fn serialize(&self, out: &mut BitWriter<'_>) {
                $(self.$idx.serialize(out);)+
            }

            fn deserialize(&mut self, input: &mut BitReader<'_>) {
                $(self.$idx.deserialize(input);)+
            }
        }
    };
}

impl_data_field_for_tuple!((A, 0));
impl_data_field_for_tuple!((A, 0), (B, 1));
impl_data_field_for_tuple!((A, 0), (B, 1), (C, 2));
impl_data_field_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3));
impl_data_field_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_data_field_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
impl_data_field_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));
impl_data_field_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7));
impl_data_field_for_tuple!(
    (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8)
);
impl_data_field_for_tuple!(
    (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8), (J, 9)
);
impl_data_field_for_tuple!(
    (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8), (J, 9), (K, 10)
);
impl_data_field_for_tuple!(
    (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7), (I, 8), (J, 9), (K, 10),
    (L, 11)
);
