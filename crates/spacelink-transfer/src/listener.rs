use std::cell::RefCell;
use std::rc::Rc;

/// A consumer of dispatched Space Packets.
///
/// The transfer service invokes `on_packet` synchronously during
/// `transmit`/`receive` with a borrowed view of the complete packet
/// (primary header first). Listeners may parse it with a fresh
/// `SpExtractor` or `SpDissector`, must not retain the slice past the
/// callback, and must not call back into the service that is dispatching.
pub trait PacketListener {
    /// Called once per matching packet.
    fn on_packet(&mut self, packet: &[u8]);
}

/// Shared handle under which listeners are registered.
///
/// Identity (for unregistering) is the allocation, via `Rc::ptr_eq`.
pub type SharedListener = Rc<RefCell<dyn PacketListener>>;

/// Wraps a listener into the shared handle the service registers.
pub fn shared_listener<L: PacketListener + 'static>(listener: L) -> SharedListener {
    Rc::new(RefCell::new(listener))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        packets: Vec<Vec<u8>>,
    }

    impl PacketListener for Recorder {
        fn on_packet(&mut self, packet: &[u8]) {
            self.packets.push(packet.to_vec());
        }
    }

    #[test]
    fn test_shared_listener_identity() {
        let first = shared_listener(Recorder { packets: Vec::new() });
        let second = shared_listener(Recorder { packets: Vec::new() });
        assert!(Rc::ptr_eq(&first, &first.clone()));
        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_listener_receives_borrowed_packet() {
        let recorder = Rc::new(RefCell::new(Recorder { packets: Vec::new() }));
        let handle: SharedListener = recorder.clone();
        handle.borrow_mut().on_packet(&[1, 2, 3]);
        assert_eq!(recorder.borrow().packets, vec![vec![1, 2, 3]]);
    }
}
