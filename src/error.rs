//! The Errors returned by the Containers and their Configuration

use std::{alloc::Layout, fmt};

/// The Allocator could not provide the memory for a new Node or Payload.
///
/// The Container is left unchanged when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    pub(crate) const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The Layout of the allocation that failed
    pub const fn layout(&self) -> Layout {
        self.layout
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "memory allocation of {} bytes (align {}) failed",
            self.layout.size(),
            self.layout.align()
        )
    }
}

impl std::error::Error for AllocError {}

/// This Error is returned when a Configuration can not be used to build a
/// Container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The Hazard-Table needs at least one Slot, otherwise no Thread could
    /// ever protect a Node and every Pop would spin forever
    NoHazardSlots,
    /// The Garbage-Threshold needs to be at least one, otherwise the
    /// Garbage-List could never be bounded by it
    ZeroGarbageThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHazardSlots => write!(f, "the hazard table needs at least one slot"),
            Self::ZeroGarbageThreshold => {
                write!(f, "the garbage threshold needs to be at least one")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// This Error is returned when moving the contents of one Stack into another
/// one is not allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignError {
    /// The target Stack still holds live or retired Nodes, which would be
    /// lost if the contents were overwritten
    Populated,
}

impl fmt::Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Populated => write!(f, "can not assign into a populated stack"),
        }
    }
}

impl std::error::Error for AssignError {}
