//! Message segments for VPLink.
//!
//! A segment is one byte-bounded slice of sanitized plain text, sized to fit
//! the Virtual Paradise per-message limit. Each segment remembers where it
//! came from in the source text.

use serde::Serialize;
use std::ops::Range;

/// Maximum number of bytes a single Virtual Paradise chat message may carry.
pub const MAX_SEGMENT_BYTES: usize = 255;

/// One outbound slice of plain text.
///
/// The content is stored as a `String`, so every segment is valid UTF-8 on
/// its own: the chunker never cuts through a code point. Segments are only
/// built by the chunker, which holds them to its byte budget.
///
/// # Examples
///
/// ```
/// use vplink::chunking::chunk_text;
///
/// let segments = chunk_text("Hello, world!");
/// assert_eq!(segments[0].len(), 13);
/// assert_eq!(segments[0].as_bytes(), b"Hello, world!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MessageSegment {
    /// Segment text.
    content: String,

    /// Byte range in the sanitized source text.
    byte_range: Range<usize>,

    /// Sequential index within the message (0-based).
    index: usize,
}

impl MessageSegment {
    /// Creates a new segment. Callers keep `content` within the budget.
    #[must_use]
    pub(crate) const fn new(content: String, byte_range: Range<usize>, index: usize) -> Self {
        Self {
            content,
            byte_range,
            index,
        }
    }

    /// Returns the segment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Returns the raw UTF-8 bytes sent over the wire.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Consumes the segment, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.content
    }

    /// Returns the size of the segment in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.content.len()
    }

    /// Checks if the segment is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the sequential index of this segment.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the byte range in the source text.
    #[must_use]
    pub const fn byte_range(&self) -> &Range<usize> {
        &self.byte_range
    }

    /// Returns the start byte offset in the source text.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.byte_range.start
    }

    /// Returns the end byte offset in the source text.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.byte_range.end
    }
}

impl AsRef<str> for MessageSegment {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for MessageSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_new() {
        let segment = MessageSegment::new("Hello".to_string(), 0..5, 0);
        assert_eq!(segment.as_str(), "Hello");
        assert_eq!(segment.byte_range(), &(0..5));
        assert_eq!(segment.index(), 0);
    }

    #[test]
    fn test_segment_offsets() {
        let segment = MessageSegment::new("world".to_string(), 7..12, 1);
        assert_eq!(segment.start(), 7);
        assert_eq!(segment.end(), 12);
    }

    #[test]
    fn test_segment_len_counts_bytes() {
        let segment = MessageSegment::new("世界".to_string(), 0..6, 0);
        assert_eq!(segment.len(), 6);
        assert_eq!(segment.as_bytes().len(), 6);
    }

    #[test]
    fn test_segment_display() {
        let segment = MessageSegment::new("hi there".to_string(), 0..8, 0);
        assert_eq!(segment.to_string(), "hi there");
        assert_eq!(segment.into_string(), "hi there");
    }

    #[test]
    fn test_segment_serialization() {
        let segment = MessageSegment::new("test".to_string(), 0..4, 0);
        let value = serde_json::to_value(&segment).unwrap();
        assert_eq!(value["content"], "test");
        assert_eq!(value["index"], 0);
    }

    #[test]
    fn test_segment_empty() {
        let segment = MessageSegment::new(String::new(), 0..0, 0);
        assert!(segment.is_empty());
        assert_eq!(segment.len(), 0);
    }
}
