use std::fmt::Debug;

use crate::sync;

use super::{claim::Claim, guard::Guard, record::Record};

/// A single Entry in the Hazard-Table
pub(crate) struct Slot<C> {
    pub(super) claim: C,
    pub(super) record: Record,
}

/// A fixed-size Table of Hazard-Slots.
///
/// The Size is set once on creation and bounds the Number of Threads that
/// can protect a Node at the same Time. Threads that don't find a free Slot
/// have to wait for one to be released.
pub(crate) struct Table<C> {
    slots: Box<[Slot<C>]>,
}

impl<C> Table<C>
where
    C: Claim,
{
    /// Creates a new Table with `size` Slots that are all released
    pub fn new(size: usize) -> Self {
        let slots = (0..size)
            .map(|_| Slot {
                claim: C::released(),
                record: Record::new(),
            })
            .collect();

        Self { slots }
    }

    /// Makes a single pass over the Table and claims the first free Slot
    pub fn try_acquire(&self) -> Option<Guard<'_, C>> {
        self.slots
            .iter()
            .find(|slot| slot.claim.try_claim())
            .map(Guard::new)
    }

    /// Spins over the Table until a Slot could be claimed
    pub fn acquire(&self) -> Guard<'_, C> {
        loop {
            if let Some(guard) = self.try_acquire() {
                return guard;
            }
            sync::spin();
        }
    }

    /// Checks if any Slot currently protects the given Ptr
    pub fn is_protected<T>(&self, ptr: *const T) -> bool {
        let ptr = ptr as *const ();
        self.slots.iter().any(|slot| slot.record.protects(ptr))
    }

    /// Checks that no Slot protects anything
    pub fn is_clear(&self) -> bool {
        self.slots.iter().all(|slot| slot.record.is_clear())
    }
}

impl<C> Debug for Table<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hazard-Table ( slots = {} )", self.slots.len())
    }
}
