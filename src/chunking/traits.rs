//! Chunker trait definition.
//!
//! Defines the interface for splitting sanitized text into outbound
//! segments.

use crate::core::{MAX_SEGMENT_BYTES, MessageSegment};
use crate::error::{ChunkingError, Result};

/// Smallest budget that always fits one UTF-8 code point.
pub const MIN_SEGMENT_BYTES: usize = 4;

/// Trait for splitting text into wire-sized segments.
///
/// Implementations must be `Send + Sync` so one chunker can be shared by
/// every relay task. Output must be deterministic, ordered, and lossless:
/// concatenating the segments reproduces the input exactly.
///
/// # Examples
///
/// ```
/// use vplink::chunking::{ByteChunker, Chunker};
///
/// let chunker = ByteChunker::with_limit(10);
/// let segments = chunker.chunk("Hello, world! ").unwrap();
/// assert_eq!(segments.len(), 2);
/// ```
pub trait Chunker: Send + Sync {
    /// Splits `text` into segments.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunker configuration is invalid.
    fn chunk(&self, text: &str) -> Result<Vec<MessageSegment>>;

    /// Returns the name of the chunking strategy.
    fn name(&self) -> &'static str;

    /// Returns the byte budget of a single segment.
    fn max_bytes(&self) -> usize;

    /// Returns a description of the chunking strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Validates the byte budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the budget cannot hold a code point or exceeds
    /// the Virtual Paradise message limit.
    fn validate(&self) -> Result<()> {
        let max_bytes = self.max_bytes();
        if max_bytes < MIN_SEGMENT_BYTES {
            return Err(ChunkingError::InvalidConfig {
                reason: format!("max_bytes must be >= {MIN_SEGMENT_BYTES}, got {max_bytes}"),
            }
            .into());
        }
        if max_bytes > MAX_SEGMENT_BYTES {
            return Err(ChunkingError::ChunkTooLarge {
                size: max_bytes,
                max: MAX_SEGMENT_BYTES,
            }
            .into());
        }
        Ok(())
    }
}
