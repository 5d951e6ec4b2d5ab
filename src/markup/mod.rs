//! Discord markup sanitization.
//!
//! Turns rich Discord message markup into the plain text Virtual Paradise
//! chat can display:
//!
//! - **Sanitizer**: character walk with escape tracking and tag detection
//! - **Tag resolution**: mentions via the directory, timestamps via the formatter
//! - **Builder**: word and trivia accumulation into trimmed text
//! - **Timestamps**: locale-free absolute and relative rendering

pub mod builder;
pub mod sanitizer;
pub mod tag;
pub mod timestamp;

pub use builder::PlainTextBuilder;
pub use sanitizer::{Sanitizer, unescape};
pub use tag::{ResolvedTag, TagKind, TagPayload, TagResolver};
pub use timestamp::{
    TimestampFormat, format_clock, format_relative, format_timestamp, format_timestamp_at,
};
