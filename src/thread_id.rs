use std::sync::atomic::{AtomicU64, Ordering};

use crate::sync::thread_local;

/// The Owner-Value that marks a Hazard-Slot as not being owned by any Thread
pub(crate) const UNOWNED: u64 = 0;

/// Source for new Ids, starts at 1 because 0 is reserved for [`UNOWNED`]
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT: u64 = NEXT_ID.fetch_add(1, Ordering::Relaxed);
}

/// A process-unique Identity for the current Thread, that can be stored in
/// an Atomic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Id(u64);

impl Id {
    /// Loads the Id of the calling Thread, the first call on every Thread
    /// assigns it a new Id
    pub fn current() -> Self {
        Self(CURRENT.with(|id| *id))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}
