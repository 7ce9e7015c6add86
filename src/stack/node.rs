use std::mem::ManuallyDrop;

use crate::{hazard::Link, sync::atomic};

/// A single Entry of the Stack
pub(super) struct Node<T> {
    /// The Payload, it is either moved out by the Thread that popped the
    /// Node or dropped explicitly when the Stack itself is dropped, but never
    /// when the Node is freed
    data: ManuallyDrop<T>,
    /// The Node below this one, reused as the Garbage-List Link after the
    /// Node was popped
    pub next: atomic::AtomicPtr<Node<T>>,
}

impl<T> Node<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: ManuallyDrop::new(data),
            next: atomic::AtomicPtr::new(std::ptr::null_mut()),
        }
    }

    /// Unwraps a Node that was never shared
    pub fn into_inner(self) -> T {
        ManuallyDrop::into_inner(self.data)
    }

    /// Moves the Payload out of the Node
    ///
    /// # Safety
    /// This may only be called once per Node, by the Thread that unlinked it,
    /// and the Payload must not be accessed afterwards
    pub unsafe fn take(ptr: *mut Self) -> T {
        ManuallyDrop::take(&mut (*ptr).data)
    }
}

impl<T> Link for Node<T> {
    fn link(&self) -> &atomic::AtomicPtr<Self> {
        &self.next
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn take_payload() {
        let ptr = Box::into_raw(Box::new(Node::new(String::from("top"))));

        assert_eq!("top", unsafe { Node::take(ptr) });

        // The Payload was moved out, freeing the Node must not drop it again
        drop(unsafe { Box::from_raw(ptr) });
    }
}
