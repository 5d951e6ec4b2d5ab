//! Segment chunking for VPLink.
//!
//! Virtual Paradise caps a chat message at 255 bytes. This module splits
//! sanitized text into segments that respect the cap without ever cutting
//! a UTF-8 character in half.

pub mod bytes;
pub mod traits;

pub use bytes::{ByteChunker, chunk_text};
pub use traits::{Chunker, MIN_SEGMENT_BYTES};
