//! Todo storage.
//!
//! This module handles:
//! - Todo record and payload types
//! - The concurrent in-memory store that assigns identifiers

pub mod memory;
pub mod types;

pub use memory::{MemoryStore, SharedStore, FIRST_ID};
pub use types::{Todo, TodoDraft, TodoId};
