//! Storage abstraction and implementations for goalpace.
//!
//! This crate provides the trait-based store the pace engine depends on, with
//! a JSON-file reference implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory_storage;

pub use trait_::{GoalStore, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory_storage::MemoryStorage;
