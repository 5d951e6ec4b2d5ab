//! Messages moving across the bridge.
//!
//! [`InboundMessage`] is what the Discord gateway hands to the relay.
//! [`RelayedMessage`] is what either side sends to the other.

use serde::{Deserialize, Serialize};

use crate::directory::Member;

/// A message relayed between Discord and Virtual Paradise.
///
/// On the Discord to VP side there is one relayed message per segment, all
/// carrying the same author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayedMessage {
    /// Display name of the sender, if known.
    pub author: Option<String>,

    /// Message content.
    pub content: String,

    /// Whether this message is a reply to another message.
    pub is_reply: bool,
}

impl RelayedMessage {
    /// Creates a new relayed message.
    #[must_use]
    pub fn new(author: Option<String>, content: String, is_reply: bool) -> Self {
        Self {
            author,
            content,
            is_reply,
        }
    }

    /// Creates a non-reply message from a named author.
    #[must_use]
    pub fn from_author(author: &str, content: &str) -> Self {
        Self::new(Some(author.to_string()), content.to_string(), false)
    }
}

/// A Discord message as received from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// The guild member who sent the message.
    pub author: Member,

    /// Channel the message was posted in.
    pub channel_id: u64,

    /// Raw markup content.
    pub content: String,

    /// Attachment URLs, in upload order.
    #[serde(default)]
    pub attachments: Vec<String>,

    /// Whether the message replies to another message.
    #[serde(default)]
    pub is_reply: bool,
}

impl InboundMessage {
    /// Creates a message with no attachments.
    #[must_use]
    pub fn new(author: Member, channel_id: u64, content: impl Into<String>) -> Self {
        Self {
            author,
            channel_id,
            content: content.into(),
            attachments: Vec::new(),
            is_reply: false,
        }
    }

    /// Adds an attachment URL.
    #[must_use]
    pub fn attachment(mut self, url: impl Into<String>) -> Self {
        self.attachments.push(url.into());
        self
    }

    /// Marks the message as a reply.
    #[must_use]
    pub const fn reply(mut self, is_reply: bool) -> Self {
        self.is_reply = is_reply;
        self
    }
}
