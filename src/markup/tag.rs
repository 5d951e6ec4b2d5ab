//! Tag payload classification and resolution.
//!
//! A tag is the text between `<` and `>` in Discord markup. Mentions are
//! looked up in a [`Directory`]; timestamps are parsed and handed to the
//! timestamp formatter. Anything that cannot be resolved is echoed back as
//! the literal tag, so resolution never fails.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::timestamp::{TimestampFormat, format_timestamp_at};
use crate::directory::{Directory, DisplayNamePolicy};
use crate::error::DirectoryError;

/// The captured contents of a `<...>` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPayload {
    content: String,
    terminated: bool,
}

impl TagPayload {
    /// Creates a payload closed by `>`.
    #[must_use]
    pub fn closed(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            terminated: true,
        }
    }

    /// Creates a payload cut short by the end of the message.
    #[must_use]
    pub fn unterminated(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            terminated: false,
        }
    }

    /// Returns the text between the delimiters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Checks whether the closing `>` was present.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Returns the payload as it appeared in the source markup.
    ///
    /// An unterminated payload is not given a closing delimiter it never had.
    #[must_use]
    pub fn literal(&self) -> String {
        if self.terminated {
            format!("<{}>", self.content)
        } else {
            format!("<{}", self.content)
        }
    }

    /// Classifies the payload by its prefix.
    #[must_use]
    pub fn kind(&self) -> TagKind<'_> {
        TagKind::classify(&self.content)
    }
}

/// What a tag payload refers to, with the remainder after its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind<'a> {
    /// `&id` or `@&id`.
    Role(&'a str),
    /// `t:seconds[:style]`.
    Timestamp(&'a str),
    /// `@id` or `@!id`.
    User(&'a str),
    /// `#id`.
    Channel(&'a str),
    /// Anything else.
    Unknown,
}

impl<'a> TagKind<'a> {
    /// Classifies a payload. Role prefixes are checked before user prefixes
    /// because Discord writes role mentions as `@&id`.
    #[must_use]
    pub fn classify(payload: &'a str) -> Self {
        if let Some(id) = payload
            .strip_prefix("@&")
            .or_else(|| payload.strip_prefix('&'))
        {
            Self::Role(id)
        } else if let Some(spec) = payload.strip_prefix("t:") {
            Self::Timestamp(spec)
        } else if let Some(id) = payload
            .strip_prefix("@!")
            .or_else(|| payload.strip_prefix('@'))
        {
            Self::User(id)
        } else if let Some(id) = payload.strip_prefix('#') {
            Self::Channel(id)
        } else {
            Self::Unknown
        }
    }
}

/// Display form of a resolved tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTag {
    /// Final text: a resolved mention or the literal fallback.
    Text(String),
    /// A timestamp still to be rendered by the word builder.
    Timestamp {
        /// The instant the tag encodes.
        instant: DateTime<Utc>,
        /// Requested rendering style.
        format: TimestampFormat,
    },
}

impl ResolvedTag {
    /// Renders the tag to text, measuring relative timestamps from `now`.
    #[must_use]
    pub fn into_text(self, now: DateTime<Utc>) -> String {
        match self {
            Self::Text(text) => text,
            Self::Timestamp { instant, format } => format_timestamp_at(instant, format, now),
        }
    }
}

/// Resolves tag payloads against a directory.
#[derive(Debug, Clone, Default)]
pub struct TagResolver {
    names: DisplayNamePolicy,
}

impl TagResolver {
    /// Creates a resolver with the default display-name precedence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with a custom display-name precedence.
    #[must_use]
    pub const fn with_policy(names: DisplayNamePolicy) -> Self {
        Self { names }
    }

    /// Returns the display-name precedence in use.
    #[must_use]
    pub const fn policy(&self) -> &DisplayNamePolicy {
        &self.names
    }

    /// Resolves a payload. Total: every input yields a display form.
    pub async fn resolve<D>(&self, directory: &D, payload: &TagPayload) -> ResolvedTag
    where
        D: Directory + ?Sized,
    {
        let resolved = match payload.kind() {
            TagKind::Role(id) => match parse_snowflake(id) {
                Some(id) => settle("role", id, directory.find_role(id).await)
                    .map(|role| format!("@{}", role.name)),
                None => None,
            },
            TagKind::User(id) => match parse_snowflake(id) {
                Some(id) => settle("member", id, directory.find_member(id).await)
                    .map(|member| format!("@{}", self.names.select(&member))),
                None => None,
            },
            TagKind::Channel(id) => match parse_snowflake(id) {
                Some(id) => settle("channel", id, directory.find_channel(id).await)
                    .map(|channel| format!("#{}", channel.name)),
                None => None,
            },
            TagKind::Timestamp(spec) => {
                if let Some((instant, format)) = parse_timestamp_spec(spec) {
                    return ResolvedTag::Timestamp { instant, format };
                }
                None
            }
            TagKind::Unknown => None,
        };

        resolved.map_or_else(
            || {
                debug!(payload = payload.as_str(), "tag left as literal");
                ResolvedTag::Text(payload.literal())
            },
            ResolvedTag::Text,
        )
    }

    /// Resolves a payload straight to text.
    pub async fn resolve_text<D>(
        &self,
        directory: &D,
        payload: &TagPayload,
        now: DateTime<Utc>,
    ) -> String
    where
        D: Directory + ?Sized,
    {
        self.resolve(directory, payload).await.into_text(now)
    }
}

/// Downgrades a lookup result to an option, logging backend failures.
fn settle<T>(kind: &str, id: u64, lookup: Result<Option<T>, DirectoryError>) -> Option<T> {
    match lookup {
        Ok(found) => found,
        Err(e) => {
            warn!(kind, id, error = %e, "directory lookup failed");
            None
        }
    }
}

/// Parses a Discord snowflake. Only plain ASCII digits are accepted.
fn parse_snowflake(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Parses the part of a timestamp tag after `t:`.
///
/// Grammar: `<digits>[:<format-char>]`. A backslash toggles escaping, and an
/// escaped `:` is not a separator.
fn parse_timestamp_spec(spec: &str) -> Option<(DateTime<Utc>, TimestampFormat)> {
    let mut digits = String::with_capacity(spec.len());
    let mut format = TimestampFormat::None;
    let mut escaped = false;

    for (i, c) in spec.char_indices() {
        match c {
            '\\' => {
                escaped = !escaped;
                continue;
            }
            ':' if !escaped => {
                let mut rest = spec[i + 1..].chars();
                match (rest.next(), rest.next()) {
                    (Some(style), None) => format = TimestampFormat::from_char(style),
                    _ => return None,
                }
                break;
            }
            c if c.is_ascii_digit() => digits.push(c),
            _ => return None,
        }
        escaped = false;
    }

    if digits.is_empty() {
        return None;
    }
    let seconds: i64 = digits.parse().ok()?;
    DateTime::from_timestamp(seconds, 0).map(|instant| (instant, format))
}
