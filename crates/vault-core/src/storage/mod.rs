//! Storage backends for the persisted envelope
//!
//! This module provides two backends:
//! 1. In-memory map (tests and embedding)
//! 2. One JSON file per storage key

mod traits;
mod file;
mod memory;

pub use traits::PersistentStore;
pub use file::FileStore;
pub use memory::MemoryStore;
