//! Directory lookups for mention resolution.
//!
//! Defines the asynchronous [`Directory`] capability the sanitizer uses to
//! turn role, member, and channel IDs into display names, plus an in-memory
//! implementation.

pub mod memory;
pub mod traits;

pub use memory::{DirectorySnapshot, MemoryDirectory};
pub use traits::{Channel, Directory, DisplayNamePolicy, Member, NameSource, Role};
