//! The Hazard-Pointer Building-Blocks shared by the Containers
//!
//! Every Container owns a fixed-size [`Table`] of Hazard-Slots and a
//! [`GarbageList`]. Before dereferencing a Node loaded from a shared Ptr, a
//! Thread claims a Slot, publishes the Ptr in it and validates that the
//! shared Ptr still points to the same Node. Before freeing a Node, a Thread
//! scans the Table and defers the Node to the GarbageList if any Slot still
//! publishes its Address.
//!
//! The Slots are claimed in one of two ways:
//! * [`Flag`]: any Thread can claim any free Slot (used by the Queue)
//! * [`Owner`]: the Slot stores the Id of the Thread owning it (used by the
//!   Stack)
//!
//! # Reference:
//! * [Hazard Pointers: Safe Memory Reclamation for Lock-Free Objects](https://www.eecg.utoronto.ca/~amza/ece1747h/papers/hazard_pointers.pdf)

mod claim;
pub(crate) use claim::{Flag, Owner};

mod record;

mod table;
pub(crate) use table::Table;

mod guard;

mod garbage;
pub(crate) use garbage::{GarbageList, Link};
