//! Fallible heap allocation for Nodes and Payloads.
//!
//! `Box::new` aborts the process if the allocator fails, so everything the
//! Containers put on the heap goes through [`try_box`] instead, which hands
//! the value back on failure. Memory obtained this way has the same Layout a
//! `Box<T>` would have and is therefore released with [`free`].

use std::{alloc::Layout, ptr::NonNull};

use crate::error::AllocError;

/// Moves the Value onto the Heap and returns the raw Ptr to it
pub(crate) fn try_box<T>(value: T) -> Result<*mut T, (AllocError, T)> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        let ptr = NonNull::<T>::dangling().as_ptr();
        // # Safety:
        // Writing a zero-sized Value to a dangling but aligned Ptr is valid
        unsafe { ptr.write(value) };
        return Ok(ptr);
    }

    // # Safety:
    // The Layout has a non-zero size, which was checked above
    let block = unsafe { std::alloc::alloc(layout) } as *mut T;
    if block.is_null() {
        return Err((AllocError::new(layout), value));
    }

    // # Safety:
    // The Block was just allocated with the Layout of T and is not null
    unsafe { block.write(value) };
    Ok(block)
}

/// Drops the Value behind the Ptr and releases its memory
///
/// # Safety
/// The Ptr must have been returned by [`try_box`] and must not be used again
/// after this call
pub(crate) unsafe fn free<T>(ptr: *mut T) {
    drop(Box::from_raw(ptr));
}

/// Moves the Value back out of the Heap and releases the memory
///
/// # Safety
/// Same as for [`free`]
pub(crate) unsafe fn unbox<T>(ptr: *mut T) -> T {
    *Box::from_raw(ptr)
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn box_and_free() {
        let ptr = try_box(String::from("hazard")).unwrap();

        assert_eq!("hazard", unsafe { &*ptr });
        unsafe { free(ptr) };
    }

    #[test]
    fn box_and_unbox() {
        let ptr = try_box(vec![1, 2, 3]).unwrap();

        assert_eq!(vec![1, 2, 3], unsafe { unbox(ptr) });
    }

    #[test]
    fn zero_sized() {
        let ptr = try_box(()).unwrap();
        assert!(!ptr.is_null());
        unsafe { free(ptr) };
    }
}
