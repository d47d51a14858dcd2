use std::cell::RefCell;
use std::rc::Rc;

/// A communication layer sitting below the Space Packet layer.
///
/// The transfer service pushes every successfully transmitted packet down
/// through this one-operation contract; the sub-layer delivers inbound
/// octet strings by calling
/// [`crate::TransferService::receive_from_sub_layer`]. Neither side owns
/// the other: the service holds a shared handle acquired at wiring time,
/// and inbound packets are never pushed back down.
pub trait CommSubLayer {
    /// Accepts one outbound packet from the Space Packet layer.
    fn receive_from_upper(&mut self, packet: &[u8]);
}

/// Shared handle under which a sub-layer is wired to the service.
pub type SharedSubLayer = Rc<RefCell<dyn CommSubLayer>>;

/// Wraps a sub-layer into the shared handle the service wires.
pub fn shared_sub_layer<L: CommSubLayer + 'static>(layer: L) -> SharedSubLayer {
    Rc::new(RefCell::new(layer))
}
