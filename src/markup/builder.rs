//! Plain-text accumulator for sanitized messages.

use chrono::{DateTime, Utc};

use super::timestamp::{TimestampFormat, format_clock, format_timestamp_at};

/// Default capacity of a fresh builder, one full VP message.
const INITIAL_CAPACITY: usize = crate::core::MAX_SEGMENT_BYTES;

/// Accumulates words and their trailing whitespace into plain text.
///
/// Each word carries at most one trivia character, which is how the
/// original spacing is reproduced without any separator logic of its own.
/// The builder also pins the reference instant for relative timestamps, so
/// every `<t:...:R>` in one message is measured against the same "now".
///
/// # Examples
///
/// ```
/// use vplink::markup::PlainTextBuilder;
///
/// let mut builder = PlainTextBuilder::new();
/// builder.add_word("Hello,", Some(' '));
/// builder.add_word("world!", Some('\n'));
/// assert_eq!(builder.finalize(), "Hello, world!");
/// ```
#[derive(Debug, Clone)]
pub struct PlainTextBuilder {
    buffer: String,
    reference_time: DateTime<Utc>,
}

impl Default for PlainTextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainTextBuilder {
    /// Creates an empty builder measuring relative times from now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reference_time(Utc::now())
    }

    /// Creates an empty builder with a fixed reference instant.
    #[must_use]
    pub fn with_reference_time(reference_time: DateTime<Utc>) -> Self {
        Self {
            buffer: String::with_capacity(INITIAL_CAPACITY),
            reference_time,
        }
    }

    /// Returns the instant relative timestamps are measured from.
    #[must_use]
    pub const fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// Appends a word followed by its trivia character, if any.
    pub fn add_word(&mut self, word: &str, trivia: Option<char>) {
        self.buffer.push_str(word);
        if let Some(whitespace) = trivia {
            self.buffer.push(whitespace);
        }
    }

    /// Appends a rendered timestamp.
    ///
    /// Fixed formats are written as the date/time body followed by a
    /// separate `UTC` word, which takes the trivia. Relative and unknown
    /// formats are a single word.
    pub fn add_timestamp(
        &mut self,
        instant: DateTime<Utc>,
        format: TimestampFormat,
        trivia: Option<char>,
    ) {
        match format_clock(instant, format) {
            Some(body) => {
                self.add_word(&body, Some(' '));
                self.add_word("UTC", trivia);
            }
            None => {
                let text = format_timestamp_at(instant, format, self.reference_time);
                self.add_word(&text, trivia);
            }
        }
    }

    /// Resets the builder, keeping its allocation and reference instant.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Checks if nothing has been written since creation or the last clear.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the accumulated text with surrounding whitespace removed.
    ///
    /// Does not consume or modify the builder, so repeated calls return the
    /// same text.
    #[must_use]
    pub fn finalize(&self) -> String {
        self.buffer.trim().to_string()
    }
}
