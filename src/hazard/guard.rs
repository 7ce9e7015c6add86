use std::fmt::Debug;

use crate::sync::atomic;

use super::{claim::Claim, table::Slot};

/// A Guard holds a claimed Hazard-Slot and releases it again once it is
/// dropped, which also clears whatever the Slot was protecting
pub(crate) struct Guard<'t, C>
where
    C: Claim,
{
    slot: &'t Slot<C>,
}

impl<'t, C> Guard<'t, C>
where
    C: Claim,
{
    pub(super) fn new(slot: &'t Slot<C>) -> Self {
        Self { slot }
    }

    /// Loads the most recent Ptr-Value from the given AtomicPtr and protects
    /// it with this Guard, replacing whatever was protected before.
    ///
    /// The returned Ptr is safe to dereference until the Guard protects
    /// something else or is dropped, as long as every Thread that retires
    /// it checks the Hazard-Table first.
    pub fn protect<T>(&self, atom_ptr: &atomic::AtomicPtr<T>) -> *mut T {
        self.slot.record.protect(atom_ptr)
    }
}

impl<'t, C> Drop for Guard<'t, C>
where
    C: Claim,
{
    fn drop(&mut self) {
        // The Record has to be cleared before the Slot can be claimed by
        // anyone else
        self.slot.record.reset();
        self.slot.claim.release();
    }
}

impl<'t, C> Debug for Guard<'t, C>
where
    C: Claim,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Guard ( {:?} )", self.slot.record)
    }
}
