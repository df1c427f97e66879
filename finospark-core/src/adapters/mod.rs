//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - In-memory store for tests and previews
//! - JSON Lines file for the CLI's local draft history

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlDraftStore;
pub use memory::MemoryDraftStore;
