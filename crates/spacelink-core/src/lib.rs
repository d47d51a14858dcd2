#![warn(missing_docs)]

//! spacelink-core: foundational types and utilities.
//!
//! This crate provides the minimal set of core utilities shared across all layers:
//! - Protocol constants
//! - Error handling
//! - Service configuration
//! - Packet buffers and buffer allocation
//!
//! Protocol-specific logic lives in the specialized crates:
//! - `spacelink-codec`: bit-level cursors and typed data fields
//! - `spacelink-packet`: Space Packet headers, builders, extractors
//! - `spacelink-transfer`: packet transfer service and listener dispatch

/// Protocol constants shared across layers.
pub mod constants {
    /// The size of the Space Packet primary header, in octets.
    pub const PRIMARY_HEADER_OCTETS: usize = 6;
    /// Smallest legal Space Packet: a primary header plus one data octet.
    pub const PACKET_MIN_OCTETS: usize = 7;
    /// Largest legal Space Packet: a primary header plus a 65536-octet data
    /// field (the length field stores the octet count minus one in 16 bits).
    pub const PACKET_MAX_OCTETS: usize = 65542;
    /// Application process identifier reserved for idle packets (all ones).
    pub const APID_IDLE: u16 = 0x7FF;
    /// Number of distinct APID values (11-bit field, idle included).
    pub const APID_COUNT: usize = 0x800;
    /// Per-APID sequence counts wrap at this modulus (14-bit field).
    pub const SEQUENCE_COUNT_MODULO: u16 = 1 << 14;
    /// Default capacity of the transfer service listener table.
    pub const DEFAULT_MAX_LISTENERS: usize = 1000;
}

/// Service configuration.
pub mod config;
/// Error types and results.
pub mod error;
/// Owned packet buffers.
pub mod buffer;
/// Buffer allocation for packet storage.
pub mod alloc;
