//! The event-loop adapter contract.
//!
//! The dispatcher never reads a socket itself; it asks whatever adapter it
//! was attached to for read/write readiness notifications on a connection's
//! descriptor, the way `valkeyClusterLibeventAttach`/`valkeyClusterLibuvAttach`
//! hand a small vtable-like handle to the C client. This crate treats the
//! adapter opaquely: it only ever calls these five operations.

/// A raw descriptor identifying one connection's readiness registration.
/// Concretely a `RawFd`/`SOCKET` on a real transport; callers using the
/// in-memory [`crate::transport::Transport`] stub may use any stable id.
pub type Descriptor = usize;

/// Implemented by whatever event loop a caller wires this crate into
/// (`mio`, `tokio`, `libevent`, `libuv`, ...). The library calls these
/// synchronously and never blocks inside them; the adapter is responsible
/// for invoking [`ReadinessCallbacks::readable`]/`writable` later, from the
/// loop's own thread, when the descriptor becomes ready.
pub trait EventLoopAdapter {
    /// Binds this adapter to a dispatcher-owned context. Called once,
    /// before any other method.
    fn attach(&mut self, context: Box<dyn ReadinessCallbacks>);

    fn add_read(&mut self, descriptor: Descriptor);
    fn del_read(&mut self, descriptor: Descriptor);
    fn add_write(&mut self, descriptor: Descriptor);
    fn del_write(&mut self, descriptor: Descriptor);

    /// Releases any resources the adapter holds for `descriptor` (timers,
    /// registrations). Called once a connection is fully torn down.
    fn cleanup(&mut self, descriptor: Descriptor);
}

/// The callback surface an adapter drives. Implemented by the dispatcher;
/// handed to the adapter via `attach`.
pub trait ReadinessCallbacks {
    fn on_readable(&mut self, descriptor: Descriptor);
    fn on_writable(&mut self, descriptor: Descriptor);
    /// A per-connection timer (reconnect delay, command timeout) fired.
    fn on_timeout(&mut self, descriptor: Descriptor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingAdapter {
        reads: Rc<RefCell<Vec<Descriptor>>>,
    }

    impl EventLoopAdapter for RecordingAdapter {
        fn attach(&mut self, _context: Box<dyn ReadinessCallbacks>) {}
        fn add_read(&mut self, descriptor: Descriptor) {
            self.reads.borrow_mut().push(descriptor);
        }
        fn del_read(&mut self, descriptor: Descriptor) {
            self.reads.borrow_mut().retain(|d| *d != descriptor);
        }
        fn add_write(&mut self, _descriptor: Descriptor) {}
        fn del_write(&mut self, _descriptor: Descriptor) {}
        fn cleanup(&mut self, _descriptor: Descriptor) {}
    }

    #[test]
    fn add_and_del_read_are_symmetric() {
        let mut adapter = RecordingAdapter::default();
        adapter.add_read(3);
        assert_eq!(*adapter.reads.borrow(), vec![3]);
        adapter.del_read(3);
        assert!(adapter.reads.borrow().is_empty());
    }
}
