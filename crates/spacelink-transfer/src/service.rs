use std::cell::RefCell;
use std::rc::Rc;

use spacelink_core::alloc::{BufferAllocator, HeapAllocator};
use spacelink_core::buffer::HeapBuffer;
use spacelink_core::config::ServiceConfig;
use spacelink_core::constants::{APID_COUNT, SEQUENCE_COUNT_MODULO};
use spacelink_packet::{PrimaryHeader, SpPacket};
use tracing::{debug, warn};

use crate::layer::SharedSubLayer;
use crate::listener::SharedListener;
use crate::telemetry::TransferTelemetry;

/// Matches packets a listener registered for.
#[derive(Clone, Copy, Debug)]
enum ApidMatcher {
    /// Every packet.
    Any,
    /// Packets carrying one specific APID.
    Equals(u16),
}

impl ApidMatcher {
    fn matches(&self, apid: u16) -> bool {
        match self {
            ApidMatcher::Any => true,
            ApidMatcher::Equals(wanted) => *wanted == apid,
        }
    }
}

struct ListenerEntry {
    listener: SharedListener,
    matcher: ApidMatcher,
}

/// Bookkeeping kept per application process identifier.
#[derive(Debug, Clone, Default)]
pub struct ApidContext {
    /// Sequence count the next packet on this APID will carry (outbound) or
    /// must carry (inbound), modulo 2^14.
    pub next_count: u16,
    /// Packets transmitted on this APID.
    pub tx_count: u64,
    /// Packets received on this APID.
    pub rx_count: u64,
}

/// Publish/subscribe hub for Space Packets.
///
/// Producers call [`TransferService::transmit`] with a finished builder; the
/// service stamps the per-APID sequence count, finalizes and validates the
/// packet, notifies matching listeners in registration order, and forwards
/// the octets to the wired sub-layer. Inbound octet strings enter through
/// [`TransferService::receive_from_sub_layer`] and are checked against the
/// per-APID expected sequence count before dispatch.
///
/// The listener table has fixed capacity (`config.max_listeners`); removal
/// swaps with the last entry, so the relative order of the remaining
/// listeners is not preserved across unregistrations.
///
/// Dispatch callbacks must not call back into the service. A direct
/// instance makes that unrepresentable (the service is exclusively
/// borrowed during dispatch); the global accessor
/// [`with_transfer_service`] detects the attempt and refuses it.
pub struct TransferService<A: BufferAllocator = HeapAllocator> {
    config: ServiceConfig,
    listeners: Vec<ListenerEntry>,
    contexts: Box<[ApidContext]>,
    sub_layer: Option<SharedSubLayer>,
    telemetry: TransferTelemetry,
    allocator: A,
}

impl TransferService<HeapAllocator> {
    /// Creates a service backed by plain heap allocation.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_allocator(config, HeapAllocator)
    }
}

impl Default for TransferService<HeapAllocator> {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

impl<A: BufferAllocator> TransferService<A> {
    /// Creates a service with a caller-supplied buffer allocator.
    pub fn with_allocator(config: ServiceConfig, allocator: A) -> Self {
        let listener_capacity = config.max_listeners;
        Self {
            config,
            listeners: Vec::with_capacity(listener_capacity),
            contexts: vec![ApidContext::default(); APID_COUNT].into_boxed_slice(),
            sub_layer: None,
            telemetry: TransferTelemetry::default(),
            allocator,
        }
    }

    /// Registers a listener for every APID. A full table refuses the
    /// registration.
    pub fn register_listener(&mut self, listener: SharedListener) {
        self.register(listener, ApidMatcher::Any);
    }

    /// Registers a listener for one specific APID (masked to 11 bits).
    pub fn register_listener_for_apid(&mut self, listener: SharedListener, apid: u16) {
        self.register(listener, ApidMatcher::Equals(apid & 0x7FF));
    }

    fn register(&mut self, listener: SharedListener, matcher: ApidMatcher) {
        if self.listeners.len() >= self.config.max_listeners {
            warn!("listener table full ({}), registration refused", self.config.max_listeners);
            return;
        }
        self.listeners.push(ListenerEntry { listener, matcher });
    }

    /// Removes a listener by handle identity, swapping the last entry into
    /// its slot. Unknown handles are ignored.
    pub fn unregister_listener(&mut self, listener: &SharedListener) {
        if let Some(index) =
            self.listeners.iter().position(|entry| Rc::ptr_eq(&entry.listener, listener))
        {
            self.listeners.swap_remove(index);
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Wires the one downstream communication layer. Replaces any previous
    /// wiring.
    pub fn set_sub_layer(&mut self, sub_layer: SharedSubLayer) {
        self.sub_layer = Some(sub_layer);
    }

    /// Unwires the downstream communication layer.
    pub fn clear_sub_layer(&mut self) {
        self.sub_layer = None;
    }

    /// Stamps, finalizes, validates, and dispatches one outbound packet.
    ///
    /// Invalid packets bump `tx_err` and are dropped without consuming a
    /// sequence count.
    pub fn transmit<P: SpPacket>(&mut self, packet: &mut P) {
        let apid = packet.primary().apid.value();
        let next_count = self.contexts[apid as usize].next_count;
        packet.primary_mut().sequence_count.set_value(next_count);
        packet.finalize();

        if !packet.is_valid() {
            self.telemetry.tx_err += 1;
            warn!("dropping invalid outbound packet (apid {:#05X})", apid);
            return;
        }

        let bytes = packet.as_bytes();
        self.dispatch(apid, bytes);
        if let Some(sub_layer) = &self.sub_layer {
            sub_layer.borrow_mut().receive_from_upper(bytes);
        }

        self.telemetry.tx += 1;
        let context = &mut self.contexts[apid as usize];
        context.tx_count += 1;
        context.next_count = (context.next_count + 1) % SEQUENCE_COUNT_MODULO;
    }

    /// Accepts one inbound packet from the wired sub-layer.
    ///
    /// Idle packets are dispatched unconditionally. Non-idle packets must
    /// carry exactly the expected per-APID sequence count; a mismatch bumps
    /// `rx_err` and drops the packet without advancing the context. Inbound
    /// packets are never pushed back to the sub-layer.
    pub fn receive_from_sub_layer(&mut self, bytes: &[u8]) {
        let header = match PrimaryHeader::from_bytes(bytes) {
            Ok(header) => header,
            Err(err) => {
                self.telemetry.rx_err += 1;
                warn!("dropping inbound packet: {}", err);
                return;
            }
        };
        let apid = header.apid.value();

        if header.is_idle() {
            self.dispatch(apid, bytes);
            self.telemetry.rx += 1;
            self.telemetry.rx_idle += 1;
            self.contexts[apid as usize].rx_count += 1;
            return;
        }

        let expected = self.contexts[apid as usize].next_count;
        let received = header.sequence_count.value();
        if received != expected {
            self.telemetry.rx_err += 1;
            warn!(
                "sequence mismatch on apid {:#05X}: received {}, expected {}",
                apid, received, expected
            );
            return;
        }

        self.dispatch(apid, bytes);
        self.telemetry.rx += 1;
        let context = &mut self.contexts[apid as usize];
        context.rx_count += 1;
        context.next_count = (context.next_count + 1) % SEQUENCE_COUNT_MODULO;
    }

    fn dispatch(&self, apid: u16, bytes: &[u8]) {
        debug!("dispatching {} octets on apid {:#05X}", bytes.len(), apid);
        for entry in &self.listeners {
            if entry.matcher.matches(apid) {
                entry.listener.borrow_mut().on_packet(bytes);
            }
        }
    }

    /// The transfer counters.
    pub fn telemetry(&self) -> &TransferTelemetry {
        &self.telemetry
    }

    /// The bookkeeping for one APID (masked to 11 bits).
    pub fn context(&self, apid: u16) -> &ApidContext {
        &self.contexts[(apid & 0x7FF) as usize]
    }

    /// Allocates a packet buffer from the service allocator.
    pub fn allocate_packet_buffer(&mut self, octets: usize) -> HeapBuffer {
        self.allocator.allocate(octets)
    }

    /// Returns a packet buffer to the service allocator.
    pub fn release_packet_buffer(&mut self, buffer: HeapBuffer) {
        self.allocator.deallocate(buffer);
    }
}

thread_local! {
    static TRANSFER_SERVICE: RefCell<TransferService> =
        RefCell::new(TransferService::new(ServiceConfig::default()));
}

/// Runs `f` against the process-wide transfer service.
///
/// Thin convenience over explicit construction; producers that can thread a
/// handle should prefer owning a [`TransferService`] directly. Returns
/// `None` without running `f` when called re-entrantly, i.e. from inside a
/// listener or sub-layer callback of the global service.
pub fn with_transfer_service<R>(f: impl FnOnce(&mut TransferService) -> R) -> Option<R> {
    TRANSFER_SERVICE.with(|service| match service.try_borrow_mut() {
        Ok(mut service) => Some(f(&mut service)),
        Err(_) => {
            warn!("re-entrant transfer service access refused");
            None
        }
    })
}
