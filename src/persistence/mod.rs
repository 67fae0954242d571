//! Persistence Module
//!
//! JSON save documents for the quest ledger and the stores that hold them.

pub mod codec;
pub mod format;
pub mod store;

pub use codec::{decode, encode, read_ledger, write_ledger, LEGACY_ETERNAL_POINTS};
pub use format::{SaveFormat, TAGGED_FORMAT_VERSION};
pub use store::{JsonFileStore, MemoryStore, ProgressStore};
