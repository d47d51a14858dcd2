use spacelink_codec::{BitReader, BitWriter, DataField};

/// Types usable as the secondary-header slot of a Space Packet.
///
/// The slot must cover whole octets; its serialized size is derived from the
/// field width.
pub trait SpSecondaryHeader: DataField + Default {
    /// Serialized size in whole octets.
    const SIZE_OCTETS: usize = Self::WIDTH_BITS / 8;
}

/// A mission-defined secondary header: a time-code field followed by an
/// ancillary-data field.
///
/// Both members must cover an integral number of octets; either may be the
/// empty group `()`. A fully empty secondary header (size 0) means the
/// packet carries none, and [`EmptySecondaryHeader`] names that case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecondaryHeader<TC: DataField, ANC: DataField> {
    /// Mission epoch or segment time code.
    pub time_code: TC,
    /// Mission-defined ancillary data.
    pub ancillary: ANC,
}

impl<TC: DataField, ANC: DataField> SecondaryHeader<TC, ANC> {
    const SHAPE_OK: () = assert!(
        TC::WIDTH_BITS % 8 == 0 && ANC::WIDTH_BITS % 8 == 0,
        "secondary header fields must consist of whole octets"
    );

    /// Serialized size in whole octets.
    pub const SIZE_OCTETS: usize = (TC::WIDTH_BITS + ANC::WIDTH_BITS) / 8;

    /// Creates a secondary header from its two members.
    pub fn new(time_code: TC, ancillary: ANC) -> Self {
        let _ = Self::SHAPE_OK;
        Self { time_code, ancillary }
    }
}

impl<TC: DataField, ANC: DataField> DataField for SecondaryHeader<TC, ANC> {
    const WIDTH_BITS: usize = TC::WIDTH_BITS + ANC::WIDTH_BITS;

    fn serialize(&self, out: &mut BitWriter<'_>) {
        let _ = Self::SHAPE_OK;
        self.time_code.serialize(out);
        self.ancillary.serialize(out);
    }

    fn deserialize(&mut self, input: &mut BitReader<'_>) {
        let _ = Self::SHAPE_OK;
        self.time_code.deserialize(input);
        self.ancillary.deserialize(input);
    }
}

impl<TC: DataField + Default, ANC: DataField + Default> SpSecondaryHeader
    for SecondaryHeader<TC, ANC>
{
}

/// The absent secondary header: both members empty, size zero.
pub type EmptySecondaryHeader = SecondaryHeader<(), ()>;
