//! Goal store collaborators for goaltrack.
//!
//! This crate provides the trait-based goal store interface with an
//! in-memory implementation and a JSON-file reference implementation.
//! Both reject stale writes through per-goal optimistic versioning.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{GoalStore, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStore;
