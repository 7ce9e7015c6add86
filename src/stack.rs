//! A lock-free, unbounded Multi-Producer Multi-Consumer LIFO Stack
//!
//! # Algorithm
//! This is a Treiber-Stack: Push and Pop both swap the Head using a single
//! Compare-And-Swap and simply retry if another Thread changed the Head in
//! the mean time.
//!
//! Popping needs to read the Next-Ptr of the current Head before swapping it,
//! so every popping Thread owns one Hazard-Slot while it does so. This also
//! prevents the ABA-Problem, as a Node can't be freed and reallocated at the
//! same Address while some Thread still protects it. Unlinked Nodes that are
//! still protected are moved to a Garbage-List, which is swept after every
//! Pop.
//!
//! # Example
//! ```rust
//! # use hazard_collections::stack::Stack;
//! let stack = Stack::new();
//!
//! stack.push(13);
//! stack.push(14);
//!
//! assert_eq!(Some(14), stack.pop());
//! assert_eq!(Some(13), stack.pop());
//! assert_eq!(None, stack.pop());
//! ```

use std::fmt::Debug;

use crate::{
    alloc,
    config::StackConfig,
    error::{AllocError, AssignError, ConfigError},
    hazard::{GarbageList, Owner, Table},
    sync::{self, atomic},
};

mod node;
use node::Node;

/// A lock-free MPMC Stack, see the [`module-level documentation`](self)
pub struct Stack<T> {
    head: atomic::AtomicPtr<Node<T>>,
    hazards: Table<Owner>,
    garbage: GarbageList<Node<T>>,
}

impl<T> Stack<T> {
    /// Creates a new empty Stack with the default Configuration
    pub fn new() -> Self {
        Self::build(StackConfig::new())
    }

    /// Creates a new empty Stack with the given Configuration
    pub fn with_config(config: StackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StackConfig) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(hazard_slots = config.hazard_slots(), "created stack");

        Self {
            head: atomic::AtomicPtr::new(std::ptr::null_mut()),
            hazards: Table::new(config.hazard_slots()),
            garbage: GarbageList::new(),
        }
    }

    /// Pushes the Data on top of the Stack
    ///
    /// # Panics
    /// This aborts, through [`std::alloc::handle_alloc_error`], if the memory
    /// for the Node can not be allocated. Use [`try_push`](Self::try_push) to
    /// handle that case yourself
    pub fn push(&self, data: T) {
        if let Err((err, _)) = self.try_push(data) {
            std::alloc::handle_alloc_error(err.layout());
        }
    }

    /// Attempts to push the Data on top of the Stack
    ///
    /// # Returns
    /// * `Ok(())` if the Data was pushed
    /// * `Err((err, data))` if the memory for it could not be allocated, the
    /// Stack is unchanged in that case
    pub fn try_push(&self, data: T) -> Result<(), (AllocError, T)> {
        let node_ptr =
            alloc::try_box(Node::new(data)).map_err(|(err, node)| (err, node.into_inner()))?;
        // # Safety:
        // The Node was just allocated and is not shared until the CAS
        // succeeds
        let node = unsafe { &*node_ptr };

        let mut head_ptr = self.head.load(atomic::Ordering::SeqCst);
        loop {
            node.next.store(head_ptr, atomic::Ordering::SeqCst);

            match self.head.compare_exchange_weak(
                head_ptr,
                node_ptr,
                atomic::Ordering::SeqCst,
                atomic::Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => head_ptr = actual,
            };
        }
    }

    /// Attempts to pop the Entry on top of the Stack
    ///
    /// # Returns
    /// * `Some(data)` the most recently pushed Entry
    /// * `None` if the Stack was empty when it was checked
    pub fn pop(&self) -> Option<T> {
        let guard = self.hazards.acquire();

        let head_ptr = loop {
            let head_ptr = guard.protect(&self.head);
            if head_ptr.is_null() {
                break head_ptr;
            }

            // # Safety:
            // The Head is protected by the Guard and could therefore not have
            // been freed, even if some other Thread already popped it
            let next_ptr = unsafe { (*head_ptr).next.load(atomic::Ordering::SeqCst) };

            if self
                .head
                .compare_exchange(
                    head_ptr,
                    next_ptr,
                    atomic::Ordering::SeqCst,
                    atomic::Ordering::SeqCst,
                )
                .is_ok()
            {
                break head_ptr;
            }

            sync::spin();
        };
        drop(guard);

        let result = if head_ptr.is_null() {
            None
        } else {
            // # Safety:
            // The successful CAS unlinked the Node, which makes this Thread
            // the only one that will ever take its Payload or retire it
            let data = unsafe { Node::take(head_ptr) };
            unsafe { self.garbage.retire(head_ptr, &self.hazards) };
            Some(data)
        };

        self.garbage.sweep(&self.hazards);

        result
    }

    /// Checks if the Stack is currently empty.
    ///
    /// # Note
    /// This is only a Snapshot, other Threads might push or pop Entries right
    /// after it was taken
    pub fn is_empty(&self) -> bool {
        self.head.load(atomic::Ordering::SeqCst).is_null()
    }

    /// Moves all the Entries, as well as all the retired Nodes, from `other`
    /// into this Stack, leaving `other` empty.
    ///
    /// # Returns
    /// * `Ok(())` if the Contents were moved
    /// * `Err(AssignError::Populated)` if this Stack still holds Entries or
    /// retired Nodes, neither Stack is modified in that case
    ///
    /// # Example
    /// ```rust
    /// # use hazard_collections::{error::AssignError, stack::Stack};
    /// let mut source = Stack::new();
    /// source.push(1);
    ///
    /// let mut target = Stack::new();
    /// assert_eq!(Ok(()), target.transfer_from(&mut source));
    /// assert!(source.is_empty());
    ///
    /// assert_eq!(Err(AssignError::Populated), target.transfer_from(&mut source));
    /// assert_eq!(Some(1), target.pop());
    /// ```
    pub fn transfer_from(&mut self, other: &mut Self) -> Result<(), AssignError> {
        if !self.is_empty() || !self.garbage.is_empty() {
            return Err(AssignError::Populated);
        }

        std::mem::swap(&mut self.head, &mut other.head);
        std::mem::swap(&mut self.garbage, &mut other.garbage);

        #[cfg(feature = "tracing")]
        tracing::debug!(retired = self.garbage.len(), "transferred stack contents");

        Ok(())
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        debug_assert!(
            self.hazards.is_clear(),
            "a Hazard-Slot is still in use while the Stack is dropped"
        );

        let mut values = 0usize;

        let mut current = self.head.load(atomic::Ordering::SeqCst);
        while !current.is_null() {
            // # Safety:
            // Having mutable access to the Stack means that no other Thread
            // is accessing any of the Nodes and every Node still linked into
            // the Stack owns its Payload
            let next = unsafe { (*current).next.load(atomic::Ordering::SeqCst) };
            unsafe {
                drop(Node::take(current));
                alloc::free(current);
            }
            values += 1;

            current = next;
        }

        // # Safety:
        // Same as above
        let retired = unsafe { self.garbage.clear() };

        #[cfg(feature = "tracing")]
        tracing::trace!(values, retired, "dropped stack");
        #[cfg(not(feature = "tracing"))]
        let _ = (values, retired);
    }
}

impl<T> Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stack<{}> ( {:?}, {:?} )",
            std::any::type_name::<T>(),
            self.hazards,
            self.garbage
        )
    }
}

// # Safety:
// The Stack only hands out owned Payloads, which were moved in by another
// Thread, so sending or sharing it across Threads is fine as long as T can be
// sent across Threads
unsafe impl<T> Send for Stack<T> where T: Send {}
unsafe impl<T> Sync for Stack<T> where T: Send {}
