#![warn(missing_docs)]

//! spacelink-codec: non-byte-aligned serialization over octet buffers.
//!
//! This crate provides the bit-level plumbing the Space Packet layers are
//! built on:
//!
//! - [`BitWriter`] / [`BitReader`]: position-tracked big-endian bit cursors
//!   over a caller-supplied octet buffer, with a sticky bad flag instead of
//!   error returns
//! - [`DataField`]: the capability shared by everything that knows its own
//!   static bit width and can serialize itself through a cursor
//! - [`Field`], [`FieldArray`], [`Flag`]: typed carriers of N-bit unsigned
//!   values; heterogeneous groups are plain tuples of fields
//!
//! Bit order is MSB-first within every byte. Multi-byte values are
//! big-endian unless a field opts into little-endian mode, which reverses
//! whole-byte order only and is restricted to octet-multiple widths.

/// Unsigned integer carriers accepted by the cursors and fields.
pub mod unsigned;
/// Position-tracked bit-writing cursor.
pub mod writer;
/// Position-tracked bit-reading cursor.
pub mod reader;
/// The serializable-field capability and tuple composition.
pub mod data_field;
/// Single N-bit field and the one-bit flag.
pub mod field;
/// Homogeneous field arrays.
pub mod field_array;

pub use data_field::DataField;
pub use field::{Field, Flag};
pub use field_array::FieldArray;
pub use reader::BitReader;
pub use unsigned::UnsignedInt;
pub use writer::BitWriter;
