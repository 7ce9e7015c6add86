//! Construction-time Configuration for the Containers
//!
//! # Example
//! ```rust
//! # use hazard_collections::config::QueueConfig;
//! let config = QueueConfig::new()
//!     .with_hazard_slots(8)
//!     .with_garbage_threshold(256);
//!
//! assert_eq!(Ok(()), config.validate());
//! ```

use crate::error::ConfigError;

/// The Number of Hazard-Slots a Queue uses by default
pub const DEFAULT_QUEUE_HAZARD_SLOTS: usize = 16;
/// The Size of the Garbage-List at which a Queue sweeps it by default
pub const DEFAULT_GARBAGE_THRESHOLD: usize = 1024;
/// The Number of Hazard-Slots a Stack uses by default
pub const DEFAULT_STACK_HAZARD_SLOTS: usize = 32;

/// The Configuration for a [`Queue`](crate::queue::Queue)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    hazard_slots: usize,
    garbage_threshold: usize,
}

impl QueueConfig {
    /// Creates the default Configuration
    pub const fn new() -> Self {
        Self {
            hazard_slots: DEFAULT_QUEUE_HAZARD_SLOTS,
            garbage_threshold: DEFAULT_GARBAGE_THRESHOLD,
        }
    }

    /// Sets the Number of Hazard-Slots, which bounds how many Threads can
    /// access the Queue at the same Time without spinning for a free Slot
    pub const fn with_hazard_slots(mut self, slots: usize) -> Self {
        self.hazard_slots = slots;
        self
    }

    /// Sets the Number of retired Nodes that triggers a sweep of the
    /// Garbage-List
    ///
    /// # Bound
    /// A sweep puts every Node that is still protected back into the List, so
    /// right after a Pop the List holds at most
    /// `max(threshold - 1, hazard_slots)` Nodes. Without other Threads
    /// protecting Nodes, this is always below the Threshold
    pub const fn with_garbage_threshold(mut self, threshold: usize) -> Self {
        self.garbage_threshold = threshold;
        self
    }

    /// The configured Number of Hazard-Slots
    pub const fn hazard_slots(&self) -> usize {
        self.hazard_slots
    }

    /// The configured Garbage-Threshold
    pub const fn garbage_threshold(&self) -> usize {
        self.garbage_threshold
    }

    /// Checks if a Queue can be built from this Configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hazard_slots == 0 {
            return Err(ConfigError::NoHazardSlots);
        }
        if self.garbage_threshold == 0 {
            return Err(ConfigError::ZeroGarbageThreshold);
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The Configuration for a [`Stack`](crate::stack::Stack)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    hazard_slots: usize,
}

impl StackConfig {
    /// Creates the default Configuration
    pub const fn new() -> Self {
        Self {
            hazard_slots: DEFAULT_STACK_HAZARD_SLOTS,
        }
    }

    /// Sets the Number of Hazard-Slots. Every Thread that is currently
    /// popping owns one of them, so this bounds the Number of concurrent
    /// Pops that don't have to wait for a Slot
    pub const fn with_hazard_slots(mut self, slots: usize) -> Self {
        self.hazard_slots = slots;
        self
    }

    /// The configured Number of Hazard-Slots
    pub const fn hazard_slots(&self) -> usize {
        self.hazard_slots
    }

    /// Checks if a Stack can be built from this Configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hazard_slots == 0 {
            return Err(ConfigError::NoHazardSlots);
        }
        Ok(())
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new()
    }
}
