use std::fmt::Debug;

use crate::{alloc, sync::atomic};

use super::{claim::Claim, table::Table};

/// A Node that can be chained into a [`GarbageList`].
///
/// The Link is the same Next-Ptr the Node uses while it is still part of its
/// Container, it only gets reused once the Node has been unlinked.
pub(crate) trait Link: Sized {
    fn link(&self) -> &atomic::AtomicPtr<Self>;
}

/// A lock-free List of Nodes that have been removed from their Container
/// but could still be protected by some Hazard-Slot.
///
/// All Nodes in the List must have been allocated using
/// [`alloc::try_box`](crate::alloc::try_box) and are owned by the List.
pub(crate) struct GarbageList<N> {
    head: atomic::AtomicPtr<N>,
    len: atomic::AtomicUsize,
}

impl<N> GarbageList<N>
where
    N: Link,
{
    pub fn new() -> Self {
        Self {
            head: atomic::AtomicPtr::new(std::ptr::null_mut()),
            len: atomic::AtomicUsize::new(0),
        }
    }

    /// The Number of Nodes in the List, this is only a Snapshot when other
    /// Threads are retiring or sweeping at the same Time
    pub fn len(&self) -> usize {
        self.len.load(atomic::Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.head.load(atomic::Ordering::SeqCst).is_null()
    }

    /// Appends the Node to the List
    ///
    /// # Safety
    /// The Node must not be reachable through its Container anymore and the
    /// caller transfers its ownership to the List
    pub unsafe fn push(&self, node: *mut N) {
        let link = (*node).link();

        // Counted before the Node becomes visible, so a concurrent Sweep can
        // never decrement below zero
        self.len.fetch_add(1, atomic::Ordering::SeqCst);

        let mut current = self.head.load(atomic::Ordering::SeqCst);
        loop {
            link.store(current, atomic::Ordering::SeqCst);

            match self.head.compare_exchange_weak(
                current,
                node,
                atomic::Ordering::SeqCst,
                atomic::Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            };
        }
    }

    /// Reclaims an unlinked Node, it is freed right away if no Hazard-Slot
    /// protects it and otherwise deferred to the List
    ///
    /// # Safety
    /// Same as for [`push`](Self::push)
    pub unsafe fn retire<C>(&self, node: *mut N, hazards: &Table<C>)
    where
        C: Claim,
    {
        if hazards.is_protected(node) {
            self.push(node);
        } else {
            alloc::free(node);
        }
    }

    /// Takes the whole List and checks every Node against the Hazard-Table,
    /// Nodes that are still protected are put back into the List.
    ///
    /// Returns the Number of Nodes that were freed
    pub fn sweep<C>(&self, hazards: &Table<C>) -> usize
    where
        C: Claim,
    {
        let mut current = self.head.swap(std::ptr::null_mut(), atomic::Ordering::SeqCst);

        let mut freed = 0;
        let mut deferred = 0;
        while !current.is_null() {
            self.len.fetch_sub(1, atomic::Ordering::SeqCst);

            // # Safety:
            // The swap above made this Thread the only owner of the detached
            // Chain, so its Nodes can't be freed by anyone else
            let next = unsafe { &*current }
                .link()
                .swap(std::ptr::null_mut(), atomic::Ordering::SeqCst);

            if hazards.is_protected(current) {
                unsafe { self.push(current) };
                deferred += 1;
            } else {
                unsafe { alloc::free(current) };
                freed += 1;
            }

            current = next;
        }

        #[cfg(feature = "tracing")]
        if freed + deferred > 0 {
            tracing::debug!(freed, deferred, "swept garbage list");
        }
        #[cfg(not(feature = "tracing"))]
        let _ = deferred;

        freed
    }

    /// Frees every Node in the List without consulting any Hazard-Slot
    ///
    /// # Safety
    /// No other Thread may be able to access any of the Nodes, which is the
    /// case once the Container itself is being dropped
    pub unsafe fn clear(&mut self) -> usize {
        let mut current = self.head.swap(std::ptr::null_mut(), atomic::Ordering::SeqCst);

        let mut freed = 0;
        while !current.is_null() {
            let next = (*current).link().load(atomic::Ordering::SeqCst);
            alloc::free(current);
            freed += 1;
            current = next;
        }

        self.len.store(0, atomic::Ordering::SeqCst);
        freed
    }
}

impl<N> Debug for GarbageList<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GarbageList ( len = {} )",
            self.len.load(atomic::Ordering::SeqCst)
        )
    }
}
