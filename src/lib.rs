#![deny(missing_docs)]
#![warn(rust_2018_idioms, missing_debug_implementations)]
//! This crate provides a lock-free MPMC Queue and Stack, which reclaim their
//! memory using Hazard-Pointers
//!
//! # Feature-Flags
//! * `queue`: Enables the FIFO [`Queue`](queue::Queue)
//! * `stack`: Enables the LIFO [`Stack`](stack::Stack)
//! * `full`: Enables all the Containers
//! * `tracing`: Emits `tracing` Events on Construction, Garbage-Sweeps and
//! Teardown
//!
//! # Testing
//! The Containers can be model-checked using `loom`:
//! ```text
//! RUSTFLAGS="--cfg loom" cargo test --release
//! ```

mod alloc;
#[cfg_attr(not(feature = "full"), allow(dead_code, unused_imports))]
mod hazard;
mod sync;
#[cfg_attr(not(feature = "stack"), allow(dead_code))]
mod thread_id;

pub mod config;
pub mod error;

#[cfg(feature = "queue")]
pub mod queue;
#[cfg(feature = "stack")]
pub mod stack;
