//! The two ways a Hazard-Slot can be claimed by a Thread

use crate::{
    sync::atomic,
    thread_id::{self, Id},
};

/// Decides which Thread is currently allowed to publish into a Hazard-Slot
pub(crate) trait Claim {
    /// Creates the Claim in its released State
    fn released() -> Self;

    /// Attempts to claim the Slot for the current Thread
    fn try_claim(&self) -> bool;

    /// Makes the Slot available to other Threads again
    fn release(&self);
}

/// An anonymous Test-and-Set Flag, any Thread can claim any free Slot
#[derive(Debug)]
pub(crate) struct Flag(atomic::AtomicBool);

impl Claim for Flag {
    fn released() -> Self {
        Self(atomic::AtomicBool::new(false))
    }

    fn try_claim(&self) -> bool {
        !self.0.swap(true, atomic::Ordering::SeqCst)
    }

    fn release(&self) {
        self.0.store(false, atomic::Ordering::SeqCst);
    }
}

/// Stores the Id of the Thread that owns the Slot, or [`thread_id::UNOWNED`]
#[derive(Debug)]
pub(crate) struct Owner(atomic::AtomicU64);

impl Owner {
    #[cfg(test)]
    /// The Id of the Thread that currently owns the Slot
    pub fn current(&self) -> u64 {
        self.0.load(atomic::Ordering::SeqCst)
    }
}

impl Claim for Owner {
    fn released() -> Self {
        Self(atomic::AtomicU64::new(thread_id::UNOWNED))
    }

    fn try_claim(&self) -> bool {
        self.0
            .compare_exchange(
                thread_id::UNOWNED,
                Id::current().as_u64(),
                atomic::Ordering::SeqCst,
                atomic::Ordering::Relaxed,
            )
            .is_ok()
    }

    fn release(&self) {
        self.0
            .store(thread_id::UNOWNED, atomic::Ordering::SeqCst);
    }
}
