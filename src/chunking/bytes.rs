//! Byte-budget chunking strategy.
//!
//! Splits text into windows of at most `max_bytes` UTF-8 bytes. A window
//! that would end inside a multi-byte character is shortened to the
//! preceding character boundary.

use crate::chunking::traits::Chunker;
use crate::core::{MAX_SEGMENT_BYTES, MessageSegment};
use crate::error::Result;
use crate::io::find_char_boundary;

/// Chunker that fills each segment up to a byte budget.
///
/// # Examples
///
/// ```
/// use vplink::chunking::{ByteChunker, Chunker};
///
/// let chunker = ByteChunker::new();
/// let text = "x".repeat(600);
/// let segments = chunker.chunk(&text).unwrap();
/// let sizes: Vec<_> = segments.iter().map(|s| s.len()).collect();
/// assert_eq!(sizes, [255, 255, 90]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteChunker {
    /// Maximum segment size in bytes.
    max_bytes: usize,
}

impl Default for ByteChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteChunker {
    /// Creates a chunker with the Virtual Paradise message limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_bytes: MAX_SEGMENT_BYTES,
        }
    }

    /// Creates a chunker with a custom byte budget.
    ///
    /// The budget is checked when chunking, see [`Chunker::validate`].
    #[must_use]
    pub const fn with_limit(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Splits without validating the budget; callers guarantee it is >= 4.
    fn split(&self, text: &str) -> Vec<MessageSegment> {
        let mut segments = Vec::with_capacity(text.len().div_ceil(self.max_bytes));
        let mut start = 0;

        while start < text.len() {
            let end = find_char_boundary(text, start + self.max_bytes);
            segments.push(MessageSegment::new(
                text[start..end].to_string(),
                start..end,
                segments.len(),
            ));
            start = end;
        }

        segments
    }
}

impl Chunker for ByteChunker {
    fn chunk(&self, text: &str) -> Result<Vec<MessageSegment>> {
        self.validate()?;
        Ok(self.split(text))
    }

    fn name(&self) -> &'static str {
        "bytes"
    }

    fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    fn description(&self) -> &'static str {
        "Fixed byte budget per segment, aligned to UTF-8 character boundaries"
    }
}

/// Splits text with the default 255-byte budget.
#[must_use]
pub fn chunk_text(text: &str) -> Vec<MessageSegment> {
    ByteChunker::new().split(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(segments: &[MessageSegment]) -> String {
        segments.iter().map(MessageSegment::as_str).collect()
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        let segments = ByteChunker::new().chunk("").unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_small_text_single_segment() {
        let segments = chunk_text("Hello, world!");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].as_str(), "Hello, world!");
        assert_eq!(segments[0].byte_range(), &(0..13));
    }

    #[test]
    fn test_exact_budget() {
        let text = "a".repeat(255);
        let segments = chunk_text(&text);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 255);
    }

    #[test]
    fn test_600_ascii_bytes() {
        let text = "a".repeat(600);
        let segments = chunk_text(&text);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 255);
        assert_eq!(segments[1].len(), 255);
        assert_eq!(segments[2].len(), 90);
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_multibyte_boundary_shortens_window() {
        // 254 ASCII bytes then a 3-byte character straddling byte 255.
        let text = format!("{}世tail", "a".repeat(254));
        let segments = chunk_text(&text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 254);
        assert!(segments[1].as_str().starts_with('世'));
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_four_byte_characters() {
        let chunker = ByteChunker::with_limit(6);
        let text = "😀😀😀";
        let segments = chunker.chunk(text).unwrap();
        assert_eq!(segments.len(), 3);
        for segment in &segments {
            assert_eq!(segment.as_str(), "😀");
        }
    }

    #[test]
    fn test_segments_never_exceed_wire_limit() {
        let text = "aé世😀".repeat(200);
        let segments = chunk_text(&text);
        assert!(segments.len() > 1);
        assert!(segments.iter().all(|s| s.len() <= MAX_SEGMENT_BYTES));
        assert_eq!(concat(&segments), text);
    }

    #[test]
    fn test_indices_and_ranges_are_contiguous() {
        let chunker = ByteChunker::with_limit(5);
        let text = "Hello世界Test";
        let segments = chunker.chunk(text).unwrap();
        let mut expected_start = 0;
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index(), i);
            assert_eq!(segment.start(), expected_start);
            assert!(segment.len() <= 5);
            expected_start = segment.end();
        }
        assert_eq!(expected_start, text.len());
    }

    #[test]
    fn test_invalid_limits() {
        assert!(ByteChunker::with_limit(0).chunk("test").is_err());
        assert!(ByteChunker::with_limit(3).chunk("test").is_err());
        assert!(ByteChunker::with_limit(1000).chunk("test").is_err());
    }

    #[test]
    fn test_chunker_metadata() {
        let chunker = ByteChunker::default();
        assert_eq!(chunker.name(), "bytes");
        assert_eq!(chunker.max_bytes(), MAX_SEGMENT_BYTES);
        assert!(!chunker.description().is_empty());
    }
}
