#![warn(missing_docs)]

//! Spacelink: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the most
//! commonly used types for building and dispatching CCSDS Space Packets:
//!
//! - Typed fields and bit cursors (`Field`, `Flag`, `BitWriter`, `BitReader`)
//! - Packet assembly and extraction (`SpBuilder`, `SpIdleBuilder`,
//!   `SpExtractor`, `SpDissector`)
//! - The transfer service and its boundaries (`TransferService`,
//!   `PacketListener`, `CommSubLayer`)
//!
//! Example
//! ```
//! use spacelink::{EmptySecondaryHeader, SpBuilder, ServiceConfig, TransferService};
//!
//! let mut service = TransferService::new(ServiceConfig::default());
//!
//! // Build a one-octet telemetry packet and transmit it
//! let mut buffer = [0u8; 7];
//! let mut packet = SpBuilder::<EmptySecondaryHeader>::new(&mut buffer).unwrap();
//! packet.primary.apid.set_value(0x002);
//! packet.data().put_unsigned(0xABu8);
//! service.transmit(&mut packet);
//!
//! assert_eq!(service.telemetry().tx, 1);
//! ```

// Core: configuration, errors, buffers
pub use spacelink_core::alloc::{BufferAllocator, HeapAllocator, PooledAllocator};
pub use spacelink_core::buffer::{HeapBuffer, StackBuffer};
pub use spacelink_core::config::ServiceConfig;
pub use spacelink_core::constants;
pub use spacelink_core::error::{ErrorKind, Result};
// Codec: cursors and typed fields
pub use spacelink_codec::{BitReader, BitWriter, DataField, Field, FieldArray, Flag, UnsignedInt};
// Packet: headers, builders, extraction
pub use spacelink_packet::{
    EmptySecondaryHeader, PrimaryHeader, SecondaryHeader, SequenceFlags, SpBuilder, SpDissector,
    SpExtractor, SpIdleBuilder, SpPacket, SpSecondaryHeader,
};
// Transfer: dispatch service and boundaries
pub use spacelink_transfer::{
    shared_listener, shared_sub_layer, with_transfer_service, ApidContext, CommSubLayer,
    PacketListener, SharedListener, SharedSubLayer, TransferService, TransferTelemetry,
};

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{
        BitReader, BitWriter, DataField, EmptySecondaryHeader, Field, FieldArray, Flag,
        PacketListener, PrimaryHeader, SecondaryHeader, SequenceFlags, ServiceConfig, SpBuilder,
        SpDissector, SpExtractor, SpIdleBuilder, SpPacket, TransferService,
    };
}
