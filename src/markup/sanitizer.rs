//! Discord markup to plain text.
//!
//! The sanitizer walks the message one character at a time. Plain runs of
//! non-whitespace become words; `<...>` spans become tags, resolved through
//! the [`TagResolver`]; backslash escapes keep the next character inside the
//! current word. Words reach the [`PlainTextBuilder`] in input order, each
//! with the single whitespace character that ended it.
//!
//! The only suspension points are directory lookups made while resolving
//! tags.

use chrono::{DateTime, Utc};
use std::iter::Peekable;
use std::str::Chars;

use super::builder::PlainTextBuilder;
use super::tag::{ResolvedTag, TagPayload, TagResolver};
use crate::directory::Directory;

/// Characters whose backslash escape is removed from plain words.
const ESCAPABLE: &[char] = &['*', '_', '`', '~', '\\', '|', '<', '>'];

/// Initial capacity of the per-message word buffer.
const WORD_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Escaped,
}

/// Converts Discord markup into plain text.
///
/// Holds no per-message state; one sanitizer can serve any number of
/// messages, concurrently or not.
///
/// # Examples
///
/// ```
/// use vplink::directory::{Member, MemoryDirectory};
/// use vplink::markup::Sanitizer;
///
/// let directory = MemoryDirectory::new().with_member(Member::new(42, "avery"));
/// let sanitizer = Sanitizer::new();
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let text = rt.block_on(sanitizer.sanitize(&directory, r"hi <@42>, \*waves\*"));
/// assert_eq!(text, "hi @avery, *waves*");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    resolver: TagResolver,
}

impl Sanitizer {
    /// Creates a sanitizer with the default tag resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sanitizer using the given tag resolver.
    #[must_use]
    pub const fn with_resolver(resolver: TagResolver) -> Self {
        Self { resolver }
    }

    /// Returns the tag resolver.
    #[must_use]
    pub const fn resolver(&self) -> &TagResolver {
        &self.resolver
    }

    /// Sanitizes `content`, measuring relative timestamps from now.
    pub async fn sanitize<D>(&self, directory: &D, content: &str) -> String
    where
        D: Directory + ?Sized,
    {
        self.sanitize_at(directory, content, Utc::now()).await
    }

    /// Sanitizes `content` with a fixed reference instant.
    pub async fn sanitize_at<D>(&self, directory: &D, content: &str, now: DateTime<Utc>) -> String
    where
        D: Directory + ?Sized,
    {
        let mut builder = PlainTextBuilder::with_reference_time(now);
        self.sanitize_into(directory, content, &mut builder).await;
        builder.finalize()
    }

    /// Sanitizes `content`, appending its words to `builder`.
    pub async fn sanitize_into<D>(&self, directory: &D, content: &str, builder: &mut PlainTextBuilder)
    where
        D: Directory + ?Sized,
    {
        let mut word = String::with_capacity(WORD_CAPACITY);
        let mut chars = content.chars().peekable();
        let mut state = State::Normal;

        while let Some(c) = chars.next() {
            if state == State::Escaped {
                word.push(c);
                state = State::Normal;
                continue;
            }

            match c {
                '\\' => {
                    word.push(c);
                    state = State::Escaped;
                }
                '<' => {
                    flush_word(builder, &mut word, None);
                    let payload = scan_tag(&mut chars);
                    let trivia = chars.next_if(|next| next.is_whitespace());
                    match self.resolver.resolve(directory, &payload).await {
                        ResolvedTag::Text(text) => builder.add_word(&text, trivia),
                        ResolvedTag::Timestamp { instant, format } => {
                            builder.add_timestamp(instant, format, trivia);
                        }
                    }
                }
                c if c.is_whitespace() => flush_word(builder, &mut word, Some(c)),
                c => word.push(c),
            }
        }

        flush_word(builder, &mut word, None);
    }
}

/// Reads a tag payload up to the first unescaped `>`, which is consumed.
fn scan_tag(chars: &mut Peekable<Chars<'_>>) -> TagPayload {
    let mut payload = String::new();
    let mut escaped = false;

    for c in chars.by_ref() {
        if c == '>' && !escaped {
            return TagPayload::closed(payload);
        }
        escaped = c == '\\' && !escaped;
        payload.push(c);
    }

    TagPayload::unterminated(payload)
}

/// Writes a pending plain word, if there is one, and clears the buffer.
///
/// Whitespace arriving with nothing buffered is dropped, so a run of
/// separators collapses to its first character.
fn flush_word(builder: &mut PlainTextBuilder, word: &mut String, trivia: Option<char>) {
    if word.is_empty() {
        return;
    }
    builder.add_word(&unescape(word), trivia);
    word.clear();
}

/// Removes the backslash from formatting escape pairs. Other backslashes
/// are kept verbatim.
///
/// # Examples
///
/// ```
/// use vplink::markup::unescape;
///
/// assert_eq!(unescape(r"\*bold\*"), "*bold*");
/// assert_eq!(unescape(r"C:\path"), r"C:\path");
/// ```
#[must_use]
pub fn unescape(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next_if(|next| ESCAPABLE.contains(next)) {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }

    out
}
