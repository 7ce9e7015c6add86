use std::fmt::Debug;

use crate::sync::atomic;

/// The published Part of a single Hazard-Slot
pub(crate) struct Record {
    /// The Ptr that is currently protected, a Null-Ptr if the Record does
    /// not protect anything
    ptr: atomic::AtomicPtr<()>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            ptr: atomic::AtomicPtr::new(std::ptr::null_mut()),
        }
    }

    /// Loads the Ptr stored in the AtomicPtr and publishes it in this Record.
    ///
    /// The AtomicPtr is read again after publishing and the whole thing is
    /// repeated until both reads agree. Only then is it guaranteed that no
    /// other Thread could have retired the Ptr before it was published.
    pub fn protect<T>(&self, atom_ptr: &atomic::AtomicPtr<T>) -> *mut T {
        let mut protect_ptr = atom_ptr.load(atomic::Ordering::SeqCst);
        loop {
            self.ptr
                .store(protect_ptr as *mut (), atomic::Ordering::SeqCst);

            let n_ptr = atom_ptr.load(atomic::Ordering::SeqCst);
            if n_ptr == protect_ptr {
                return protect_ptr;
            }

            protect_ptr = n_ptr;
        }
    }

    /// Checks if the given Ptr is the one currently published
    pub fn protects(&self, ptr: *const ()) -> bool {
        !ptr.is_null() && self.ptr.load(atomic::Ordering::SeqCst) as *const () == ptr
    }

    pub fn is_clear(&self) -> bool {
        self.ptr.load(atomic::Ordering::SeqCst).is_null()
    }

    /// Resets the Record to its empty State, where it does not protect any
    /// Memory
    pub fn reset(&self) {
        self.ptr
            .store(std::ptr::null_mut(), atomic::Ordering::SeqCst);
    }
}

impl Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ptr = self.ptr.load(atomic::Ordering::SeqCst);
        write!(f, "Record ( ptr = {:p} )", ptr)
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn protect_reset() {
        let value = Box::into_raw(Box::new(13u32));
        let shared = atomic::AtomicPtr::new(value);

        let record = Record::new();
        assert!(record.is_clear());

        let protected = record.protect(&shared);
        assert_eq!(value, protected);
        assert!(record.protects(value as *const ()));

        record.reset();
        assert!(record.is_clear());
        assert!(!record.protects(value as *const ()));

        drop(unsafe { Box::from_raw(value) });
    }

    #[test]
    fn null_is_never_protected() {
        let shared = atomic::AtomicPtr::<u32>::new(std::ptr::null_mut());

        let record = Record::new();
        assert!(record.protect(&shared).is_null());
        assert!(!record.protects(std::ptr::null()));
    }
}
