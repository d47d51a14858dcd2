#![warn(missing_docs)]

//! spacelink-packet: CCSDS Space Packet assembly and extraction.
//!
//! Everything here speaks the wire format of the Space Packet Protocol
//! (CCSDS 133.0-B): a 48-bit primary header, an optional mission-defined
//! secondary header, and a user data field.
//!
//! - [`PrimaryHeader`]: the seven bit-packed primary header fields
//! - [`SecondaryHeader`]: time code + ancillary data, octet-multiple widths
//! - [`SpBuilder`] / [`SpIdleBuilder`]: stream user data into a caller-owned
//!   buffer, then finalize the headers in front of it
//! - [`SpExtractor`]: pull headers and a data cursor back out of a received
//!   octet string
//! - [`SpDissector`]: typed whole-packet schema for read/write round-trips
//! - [`SpPacket`]: the seam the transfer service transmits through

/// The fixed 48-bit primary header.
pub mod primary_header;
/// Optional secondary header composition.
pub mod secondary_header;
/// Packet assembly into caller-owned buffers.
pub mod builder;
/// Idle-packet assembly.
pub mod idle;
/// Packet extraction from received buffers.
pub mod extractor;
/// Typed whole-packet dissection.
pub mod dissector;

pub use builder::{SpBuilder, SpPacket};
pub use dissector::SpDissector;
pub use extractor::SpExtractor;
pub use idle::SpIdleBuilder;
pub use primary_header::{PrimaryHeader, SequenceFlags};
pub use secondary_header::{EmptySecondaryHeader, SecondaryHeader, SpSecondaryHeader};
