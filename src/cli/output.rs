//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use serde::Serialize;
use std::fmt::Write;

use crate::config::{ChatConfig, FontStyle};
use crate::core::{MessageSegment, RelayedMessage};
use crate::error::Error;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats sanitized plain text.
#[must_use]
pub fn format_plain_text(text: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{text}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Plain<'a> {
                text: &'a str,
                bytes: usize,
            }
            format_json(&Plain {
                text,
                bytes: text.len(),
            })
        }
    }
}

/// Formats chunked segments.
#[must_use]
pub fn format_segments(segments: &[MessageSegment], max_bytes: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_segments_text(segments, max_bytes),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Segments<'a> {
                max_bytes: usize,
                count: usize,
                segments: &'a [MessageSegment],
            }
            format_json(&Segments {
                max_bytes,
                count: segments.len(),
                segments,
            })
        }
    }
}

fn format_segments_text(segments: &[MessageSegment], max_bytes: usize) -> String {
    if segments.is_empty() {
        return "No segments.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} segment(s), max {max_bytes} bytes:",
        segments.len()
    );
    for segment in segments {
        let _ = writeln!(
            output,
            "[{}] {}..{} ({} bytes)",
            segment.index(),
            segment.start(),
            segment.end(),
            segment.len()
        );
        let _ = writeln!(output, "{segment}");
    }
    output
}

/// Formats a rendered timestamp.
#[must_use]
pub fn format_rendered_timestamp(
    seconds: i64,
    style: Option<char>,
    rendered: &str,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format!("{rendered}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Rendered<'a> {
                seconds: i64,
                style: Option<char>,
                text: &'a str,
            }
            format_json(&Rendered {
                seconds,
                style,
                text: rendered,
            })
        }
    }
}

/// A relayed message with the chat appearance it is sent with.
#[derive(Debug, Serialize)]
struct StyledMessage<'a> {
    author: Option<&'a str>,
    content: &'a str,
    is_reply: bool,
    color: String,
    style: FontStyle,
}

/// Formats the chat lines a message relays to.
///
/// `None` means the message was filtered out before relaying.
#[must_use]
pub fn format_relayed(
    messages: Option<&[RelayedMessage]>,
    chat: &ChatConfig,
    format: OutputFormat,
) -> String {
    let Some(messages) = messages else {
        return match format {
            OutputFormat::Text => "Message filtered, nothing relayed.\n".to_string(),
            OutputFormat::Json => format_json(&serde_json::json!({
                "relayed": false,
                "messages": [],
            })),
        };
    };

    let styled: Vec<_> = messages
        .iter()
        .map(|message| {
            let appearance = chat.style_for(message.is_reply);
            StyledMessage {
                author: message.author.as_deref(),
                content: &message.content,
                is_reply: message.is_reply,
                color: format!("#{:06X}", appearance.color),
                style: appearance.style,
            }
        })
        .collect();

    match format {
        OutputFormat::Text => {
            if styled.is_empty() {
                return "Nothing to relay.\n".to_string();
            }
            let mut output = String::new();
            for message in &styled {
                let _ = writeln!(
                    output,
                    "{}: {}",
                    message.author.unwrap_or("-"),
                    message.content
                );
            }
            output
        }
        OutputFormat::Json => format_json(&serde_json::json!({
            "relayed": true,
            "messages": styled,
        })),
    }
}

/// Formats a single line of text.
#[must_use]
pub fn format_line(line: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{line}\n"),
        OutputFormat::Json => format_json(&serde_json::json!({ "text": line })),
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            let kind = match error {
                Error::Config(_) => "config",
                Error::Chunking(_) => "chunking",
                Error::Directory(_) => "directory",
                Error::Relay(_) => "relay",
                Error::Io(_) => "io",
                Error::Command(_) => "command",
            };
            format_json(&serde_json::json!({
                "error": kind,
                "message": error.to_string(),
            }))
        }
    }
}

/// Formats a value as JSON.
pub(crate) fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
