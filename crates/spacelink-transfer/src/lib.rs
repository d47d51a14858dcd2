#![warn(missing_docs)]

//! spacelink-transfer: publish/subscribe dispatch of Space Packets.
//!
//! Producers hand finished packets to the [`TransferService`], which stamps
//! the per-APID sequence count, validates against the protocol
//! shall-statements, and notifies matching listeners; an optional
//! communication sub-layer receives every outbound packet and feeds inbound
//! octet strings back in. Dropped or malformed packets are observable only
//! through telemetry counters.
//!
//! The service is single-threaded by design: listeners are invoked
//! synchronously during `transmit`/`receive`, receive a borrowed view of the
//! packet, and must not retain it past the callback.

/// The packet listener boundary.
pub mod listener;
/// The communication sub-layer boundary.
pub mod layer;
/// Transfer telemetry counters.
pub mod telemetry;
/// The transfer service itself.
pub mod service;

pub use layer::{shared_sub_layer, CommSubLayer, SharedSubLayer};
pub use listener::{shared_listener, PacketListener, SharedListener};
pub use service::{with_transfer_service, ApidContext, TransferService};
pub use telemetry::TransferTelemetry;
