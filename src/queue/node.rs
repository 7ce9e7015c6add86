use crate::{hazard::Link, sync::atomic};

/// A single Slot in the Queue.
///
/// # Lifecycle
/// A Node is created empty and becomes the Tail. The first Producer that
/// stores its Payload into it links a new empty Node behind it. The Consumer
/// that claims it while it is the Head unlinks it and takes the Payload,
/// after which the Node only waits to be freed.
pub(super) struct Node<T> {
    /// The Payload, a Null-Ptr until a Producer fills the Slot.
    ///
    /// This is never reset to Null, so a Producer with an outdated view of
    /// the Tail can't refill a Node that was already consumed
    pub data: atomic::AtomicPtr<T>,
    /// The next Node in the Queue, set once by the Producer that filled this
    /// Node and reused as the Garbage-List Link after the Node was unlinked
    pub next: atomic::AtomicPtr<Node<T>>,
    /// The one-shot Claim of the Consumers
    taken: atomic::AtomicBool,
}

impl<T> Node<T> {
    pub fn empty() -> Self {
        Self {
            data: atomic::AtomicPtr::new(std::ptr::null_mut()),
            next: atomic::AtomicPtr::new(std::ptr::null_mut()),
            taken: atomic::AtomicBool::new(false),
        }
    }

    /// Attempts to fill the empty Slot with the given Payload
    pub fn try_fill(&self, data: *mut T) -> bool {
        self.data
            .compare_exchange(
                std::ptr::null_mut(),
                data,
                atomic::Ordering::SeqCst,
                atomic::Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Attempts to become the only Consumer that is allowed to pop this Node
    pub fn try_claim(&self) -> bool {
        !self.taken.swap(true, atomic::Ordering::SeqCst)
    }

    /// Gives up a Claim, used when the claimed Node turned out to be the
    /// empty Tail
    pub fn unclaim(&self) {
        self.taken.store(false, atomic::Ordering::SeqCst);
    }
}

impl<T> Link for Node<T> {
    fn link(&self) -> &atomic::AtomicPtr<Self> {
        &self.next
    }
}
