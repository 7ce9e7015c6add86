//! A lock-free, unbounded Multi-Producer Multi-Consumer FIFO Queue
//!
//! # Algorithm
//! The Queue is a singly linked List of Slots, where the Tail is always an
//! empty Slot. A Producer fills the current Tail by swapping its Payload-Ptr
//! from Null to the new Payload and then appends a new empty Slot, which
//! becomes the new Tail. A Consumer claims the current Head using a one-shot
//! Flag, advances the Head to its successor and takes the Payload.
//!
//! Unlinked Slots are reclaimed using Hazard-Pointers: a Slot that is still
//! protected by some other Thread is moved to a Garbage-List, which is swept
//! once it has grown to the configured Threshold.
//!
//! # Progress
//! A Producer that filled the Tail but has not yet appended the new Slot
//! makes every other Producer retry until it is done, so the Queue is only
//! lock-free as a whole and not for every individual Thread.
//!
//! # Example
//! ```rust
//! # use hazard_collections::queue::Queue;
//! let queue = Queue::new();
//!
//! queue.push(13);
//! queue.push(14);
//!
//! assert_eq!(Some(13), queue.pop());
//! assert_eq!(Some(14), queue.pop());
//! assert_eq!(None, queue.pop());
//! ```

use std::fmt::Debug;

use crate::{
    alloc,
    config::QueueConfig,
    error::{AllocError, ConfigError},
    hazard::{Flag, GarbageList, Table},
    sync::{self, atomic},
};

mod node;
use node::Node;

/// A lock-free MPMC Queue, see the [`module-level documentation`](self)
pub struct Queue<T> {
    head: atomic::AtomicPtr<Node<T>>,
    tail: atomic::AtomicPtr<Node<T>>,
    hazards: Table<Flag>,
    garbage: GarbageList<Node<T>>,
    garbage_threshold: usize,
}

impl<T> Queue<T> {
    /// Creates a new empty Queue with the default Configuration
    pub fn new() -> Self {
        Self::build(QueueConfig::new())
    }

    /// Creates a new empty Queue with the given Configuration
    ///
    /// # Example
    /// ```rust
    /// # use hazard_collections::{config::QueueConfig, error::ConfigError, queue::Queue};
    /// let queue = Queue::<u64>::with_config(QueueConfig::new().with_hazard_slots(4));
    /// assert!(queue.is_ok());
    ///
    /// let invalid = Queue::<u64>::with_config(QueueConfig::new().with_hazard_slots(0));
    /// assert_eq!(Some(ConfigError::NoHazardSlots), invalid.err());
    /// ```
    pub fn with_config(config: QueueConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: QueueConfig) -> Self {
        let initial = match alloc::try_box(Node::empty()) {
            Ok(ptr) => ptr,
            Err((err, _)) => std::alloc::handle_alloc_error(err.layout()),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            hazard_slots = config.hazard_slots(),
            garbage_threshold = config.garbage_threshold(),
            "created queue"
        );

        Self {
            head: atomic::AtomicPtr::new(initial),
            tail: atomic::AtomicPtr::new(initial),
            hazards: Table::new(config.hazard_slots()),
            garbage: GarbageList::new(),
            garbage_threshold: config.garbage_threshold(),
        }
    }

    /// Appends the Data to the end of the Queue
    ///
    /// # Panics
    /// This aborts, through [`std::alloc::handle_alloc_error`], if the memory
    /// for the Data can not be allocated. Use [`try_push`](Self::try_push) to
    /// handle that case yourself
    pub fn push(&self, data: T) {
        if let Err((err, _)) = self.try_push(data) {
            std::alloc::handle_alloc_error(err.layout());
        }
    }

    /// Attempts to append the Data to the end of the Queue
    ///
    /// # Returns
    /// * `Ok(())` if the Data was enqueued
    /// * `Err((err, data))` if the memory for it could not be allocated, the
    /// Queue is unchanged in that case
    pub fn try_push(&self, data: T) -> Result<(), (AllocError, T)> {
        let data_ptr = alloc::try_box(data)?;
        let n_tail_ptr = match alloc::try_box(Node::empty()) {
            Ok(ptr) => ptr,
            Err((err, _)) => {
                // # Safety:
                // The Payload was allocated above and was never shared
                let data = unsafe { alloc::unbox(data_ptr) };
                return Err((err, data));
            }
        };

        let guard = self.hazards.acquire();
        loop {
            let tail_ptr = guard.protect(&self.tail);
            // # Safety:
            // The Tail is never Null and the Guard keeps it from being freed,
            // even if it gets filled and consumed by other Threads
            let tail = unsafe { &*tail_ptr };

            if tail.try_fill(data_ptr) {
                tail.next.store(n_tail_ptr, atomic::Ordering::SeqCst);
                self.tail.store(n_tail_ptr, atomic::Ordering::SeqCst);
                return Ok(());
            }

            // Another Producer filled this Slot, wait for it to publish the
            // new Tail
            sync::spin();
        }
    }

    /// Attempts to remove the Entry at the front of the Queue
    ///
    /// # Returns
    /// * `Some(data)` the oldest Entry in the Queue
    /// * `None` if the Queue was empty when it was checked
    pub fn pop(&self) -> Option<T> {
        let head_ptr = loop {
            let guard = self.hazards.acquire();
            let head_ptr = guard.protect(&self.head);

            // # Safety:
            // The Head is never Null and is protected by the Guard
            let claimed = unsafe { &*head_ptr }.try_claim();
            drop(guard);

            if claimed {
                break head_ptr;
            }

            // Another Consumer is popping this Node, wait for it to advance
            // the Head
            sync::spin();
        };
        // # Safety:
        // Only the Consumer holding the Claim on the Head can unlink and
        // retire it, so the Node stays valid without a Hazard
        let head = unsafe { &*head_ptr };

        if head_ptr == self.tail.load(atomic::Ordering::SeqCst) {
            head.unclaim();
            return None;
        }

        let next = head.next.load(atomic::Ordering::SeqCst);
        self.head.store(next, atomic::Ordering::SeqCst);

        let data_ptr = head.data.load(atomic::Ordering::SeqCst);
        // # Safety:
        // The Payload was filled in before the Tail moved past this Node and
        // the Claim gives this Thread the only access to it
        let data = unsafe { alloc::unbox(data_ptr) };

        // # Safety:
        // The Node is no longer reachable from the Head
        unsafe { self.garbage.retire(head_ptr, &self.hazards) };
        if self.garbage.len() >= self.garbage_threshold {
            self.garbage.sweep(&self.hazards);
        }

        Some(data)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        debug_assert!(
            self.hazards.is_clear(),
            "a Hazard-Slot is still in use while the Queue is dropped"
        );

        let mut values = 0usize;
        let mut nodes = 0usize;

        let mut current = self.head.load(atomic::Ordering::SeqCst);
        while !current.is_null() {
            // # Safety:
            // Having mutable access to the Queue means that no other Thread
            // is accessing any of the Nodes
            let node = unsafe { &*current };
            let next = node.next.load(atomic::Ordering::SeqCst);

            let data_ptr = node.data.load(atomic::Ordering::SeqCst);
            if !data_ptr.is_null() {
                unsafe { alloc::free(data_ptr) };
                values += 1;
            }

            unsafe { alloc::free(current) };
            nodes += 1;

            current = next;
        }

        // # Safety:
        // Same as above
        let retired = unsafe { self.garbage.clear() };

        #[cfg(feature = "tracing")]
        tracing::trace!(values, nodes, retired, "dropped queue");
        #[cfg(not(feature = "tracing"))]
        let _ = (values, nodes, retired);
    }
}

impl<T> Debug for Queue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Queue<{}> ( {:?}, {:?}, garbage_threshold = {} )",
            std::any::type_name::<T>(),
            self.hazards,
            self.garbage,
            self.garbage_threshold
        )
    }
}

// # Safety:
// The Queue only hands out owned Payloads, which were moved in by another
// Thread, so sending or sharing it across Threads is fine as long as T can be
// sent across Threads
unsafe impl<T> Send for Queue<T> where T: Send {}
unsafe impl<T> Sync for Queue<T> where T: Send {}


#[cfg(all(test, loom))]
mod loom_tests {
    use super::*;
    use loom::{sync::Arc, thread};

    fn small_queue() -> Queue<u64> {
        Queue::with_config(
            QueueConfig::new()
                .with_hazard_slots(2)
                .with_garbage_threshold(1),
        )
        .unwrap()
    }

    #[test]
    fn push_while_popping() {
        loom::model(|| {
            let queue = Arc::new(small_queue());

            let producer = {
                let queue = queue.clone();
                thread::spawn(move || {
                    queue.push(1);
                    queue.push(2);
                })
            };
            let consumer = {
                let queue = queue.clone();
                thread::spawn(move || queue.pop())
            };

            producer.join().unwrap();
            let first = consumer.join().unwrap();

            let mut received: Vec<_> = first.into_iter().collect();
            while let Some(data) = queue.pop() {
                received.push(data);
            }
            assert_eq!(vec![1, 2], received);
        });
    }

    #[test]
    fn racing_consumers() {
        loom::model(|| {
            let queue = Arc::new(small_queue());
            queue.push(13);

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let queue = queue.clone();
                    thread::spawn(move || queue.pop())
                })
                .collect();

            let received: Vec<_> = handles
                .into_iter()
                .filter_map(|handle| handle.join().unwrap())
                .collect();
            assert_eq!(vec![13], received);
            assert_eq!(None, queue.pop());
        });
    }
}
