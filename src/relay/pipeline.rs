//! The Discord to Virtual Paradise pipeline and its reverse formatting.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace};

use super::avatar::Avatar;
use crate::chunking::{ByteChunker, Chunker};
use crate::config::{BotConfig, Config, DiscordConfig};
use crate::core::{InboundMessage, RelayedMessage};
use crate::directory::{Directory, DisplayNamePolicy, Member};
use crate::error::{ConfigError, Result};
use crate::markup::{Sanitizer, TagResolver};

/// Turns inbound Discord messages into Virtual Paradise chat lines.
///
/// Built with [`RelayPipeline::builder`]. Every call works on local
/// buffers only, so a pipeline can be shared across tasks behind an
/// [`Arc`]. Dropping a pending call cancels it with nothing emitted.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vplink::core::InboundMessage;
/// use vplink::directory::{Member, MemoryDirectory};
/// use vplink::relay::RelayPipeline;
///
/// let pipeline = RelayPipeline::builder()
///     .directory(Arc::new(MemoryDirectory::new()))
///     .build()
///     .unwrap();
///
/// let message = InboundMessage::new(Member::new(1, "avery"), 10, "hello");
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let relayed = rt.block_on(pipeline.to_virtual_paradise(&message)).unwrap();
/// assert_eq!(relayed[0].author.as_deref(), Some("avery"));
/// assert_eq!(relayed[0].content, "hello");
/// ```
pub struct RelayPipeline {
    directory: Arc<dyn Directory>,
    sanitizer: Sanitizer,
    chunker: ByteChunker,
    names: DisplayNamePolicy,
    bot: BotConfig,
    discord: DiscordConfig,
    include_attachments: bool,
}

impl fmt::Debug for RelayPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayPipeline")
            .field("chunker", &self.chunker)
            .field("names", &self.names)
            .field("bot", &self.bot)
            .field("discord", &self.discord)
            .field("include_attachments", &self.include_attachments)
            .finish_non_exhaustive()
    }
}

impl RelayPipeline {
    /// Starts building a pipeline.
    #[must_use]
    pub fn builder() -> RelayPipelineBuilder {
        RelayPipelineBuilder::new()
    }

    /// Decides whether a Discord message should cross the bridge.
    ///
    /// Rejects the bridge's own messages, bot messages unless
    /// `bot.relay_bot_messages` is set, and messages outside the bridged
    /// channel.
    #[must_use]
    pub fn accept(&self, message: &InboundMessage, bridge_user_id: u64) -> bool {
        let author = &message.author;
        if author.id == bridge_user_id {
            trace!(author = author.id, "ignoring own message");
            return false;
        }
        if author.bot && !self.bot.relay_bot_messages {
            debug!(author = author.id, "ignoring bot message");
            return false;
        }
        if !self.discord.accepts_channel(message.channel_id) {
            trace!(channel = message.channel_id, "ignoring message outside bridged channel");
            return false;
        }
        true
    }

    /// Decides whether a world chat message should cross the bridge.
    ///
    /// Rejects the bridge's own avatar and bot avatars unless
    /// `bot.relay_bot_messages` is set.
    #[must_use]
    pub fn accept_world_message(&self, author: &Avatar, bridge_session: u32) -> bool {
        if author.session == bridge_session {
            return false;
        }
        !author.bot || self.bot.relay_bot_messages
    }

    /// Converts a Discord message into chat lines, measuring relative
    /// timestamps from now.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured segment budget is invalid.
    pub async fn to_virtual_paradise(
        &self,
        message: &InboundMessage,
    ) -> Result<Vec<RelayedMessage>> {
        self.to_virtual_paradise_at(message, Utc::now()).await
    }

    /// Converts a Discord message into chat lines with a fixed reference
    /// instant.
    ///
    /// Attachment URLs follow the content, one per line. The result holds
    /// one message per segment, all with the author's display name and the
    /// source's reply flag. Empty content yields no messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured segment budget is invalid.
    pub async fn to_virtual_paradise_at(
        &self,
        message: &InboundMessage,
        now: DateTime<Utc>,
    ) -> Result<Vec<RelayedMessage>> {
        let content = self.compose(message);
        let plain = self
            .sanitizer
            .sanitize_at(self.directory.as_ref(), &content, now)
            .await;
        let segments = self.chunker.chunk(&plain)?;

        let author = self.author_name(&message.author);
        info!(
            author = %author,
            bytes = plain.len(),
            segments = segments.len(),
            "relaying message to Virtual Paradise"
        );

        Ok(segments
            .into_iter()
            .map(|segment| {
                RelayedMessage::new(Some(author.clone()), segment.into_string(), message.is_reply)
            })
            .collect())
    }

    /// Returns the name shown for `member`. Bots are bracketed.
    #[must_use]
    pub fn author_name(&self, member: &Member) -> String {
        let name = member.display_name(&self.names);
        if member.bot {
            format!("[{name}]")
        } else {
            name.to_string()
        }
    }

    /// Returns the display-name policy.
    #[must_use]
    pub const fn names(&self) -> &DisplayNamePolicy {
        &self.names
    }

    fn compose(&self, message: &InboundMessage) -> String {
        if !self.include_attachments || message.attachments.is_empty() {
            return message.content.trim().to_string();
        }

        let mut content = String::with_capacity(
            message.content.len()
                + message.attachments.iter().map(|a| a.len() + 1).sum::<usize>(),
        );
        content.push_str(&message.content);
        for url in &message.attachments {
            content.push('\n');
            content.push_str(url);
        }
        content.trim().to_string()
    }
}

/// Formats a world chat line for Discord.
///
/// # Examples
///
/// ```
/// use vplink::core::RelayedMessage;
/// use vplink::relay::to_discord;
///
/// let message = RelayedMessage::from_author("Avery", "hi there");
/// assert_eq!(to_discord(&message), "**Avery**: hi there");
/// ```
#[must_use]
pub fn to_discord(message: &RelayedMessage) -> String {
    match &message.author {
        Some(author) => format!("**{author}**: {}", message.content),
        None => message.content.clone(),
    }
}

/// Builder for [`RelayPipeline`].
#[derive(Default)]
pub struct RelayPipelineBuilder {
    directory: Option<Arc<dyn Directory>>,
    config: Config,
}

impl RelayPipelineBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory used to resolve mentions. Required.
    #[must_use]
    pub fn directory(mut self, directory: Arc<dyn Directory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingComponent`] without a directory, or a
    /// validation error for a bad configuration.
    pub fn build(self) -> Result<RelayPipeline> {
        let directory = self
            .directory
            .ok_or(ConfigError::MissingComponent("directory"))?;
        self.config.validate()?;
        let names = self.config.display_name_policy()?;

        Ok(RelayPipeline {
            directory,
            sanitizer: Sanitizer::with_resolver(TagResolver::with_policy(names.clone())),
            chunker: self.config.chunker(),
            names,
            bot: self.config.bot,
            discord: self.config.discord,
            include_attachments: self.config.relay.include_attachments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{MemoryDirectory, NameSource, Role};
    use crate::error::Error;

    const BRIDGE: u64 = 999;

    fn reference() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn directory() -> Arc<MemoryDirectory> {
        Arc::new(
            MemoryDirectory::new()
                .with_member(Member::new(123_456_789_012_345_678, "avery").global_name("Avery"))
                .with_role(Role {
                    id: 5,
                    name: "Mods".to_string(),
                }),
        )
    }

    fn pipeline(config: Config) -> RelayPipeline {
        RelayPipeline::builder()
            .directory(directory())
            .config(config)
            .build()
            .unwrap()
    }

    fn author() -> Member {
        Member::new(1, "casey").nickname("Case")
    }

    #[test]
    fn test_builder_requires_directory() {
        let err = RelayPipeline::builder().build().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingComponent("directory"))
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = Config::default();
        config.relay.max_segment_bytes = 1000;
        let result = RelayPipeline::builder()
            .directory(directory())
            .config(config)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_accept_filters() {
        let mut config = Config::default();
        config.discord.channel_id = 10;
        let pipeline = pipeline(config);

        let message = InboundMessage::new(author(), 10, "hi");
        assert!(pipeline.accept(&message, BRIDGE));

        let own = InboundMessage::new(Member::new(BRIDGE, "bridge"), 10, "hi");
        assert!(!pipeline.accept(&own, BRIDGE));

        let bot = InboundMessage::new(Member::new(2, "helper").bot(true), 10, "hi");
        assert!(!pipeline.accept(&bot, BRIDGE));

        let elsewhere = InboundMessage::new(author(), 11, "hi");
        assert!(!pipeline.accept(&elsewhere, BRIDGE));
    }

    #[test]
    fn test_accept_bots_when_enabled() {
        let mut config = Config::default();
        config.bot.relay_bot_messages = true;
        let pipeline = pipeline(config);

        let bot = InboundMessage::new(Member::new(2, "helper").bot(true), 10, "hi");
        assert!(pipeline.accept(&bot, BRIDGE));
    }

    #[test]
    fn test_accept_world_message() {
        let pipeline = pipeline(Config::default());
        let user = Avatar::new(2, 100, "Avery");
        let bot = Avatar::new(3, 101, "Helper").bot(true);

        assert!(pipeline.accept_world_message(&user, 1));
        assert!(!pipeline.accept_world_message(&user, 2));
        assert!(!pipeline.accept_world_message(&bot, 1));
    }

    #[tokio::test]
    async fn test_to_virtual_paradise_sanitizes() {
        let pipeline = pipeline(Config::default());
        let message = InboundMessage::new(
            author(),
            10,
            "Hello <@123456789012345678>, <@&5> meet at <t:1700000000:t>",
        )
        .reply(true);

        let relayed = pipeline
            .to_virtual_paradise_at(&message, reference())
            .await
            .unwrap();

        assert_eq!(relayed.len(), 1);
        assert_eq!(relayed[0].author.as_deref(), Some("Case"));
        assert_eq!(relayed[0].content, "Hello @Avery, @Mods meet at 22:13 UTC");
        assert!(relayed[0].is_reply);
    }

    #[tokio::test]
    async fn test_to_virtual_paradise_splits_long_content() {
        let pipeline = pipeline(Config::default());
        let message = InboundMessage::new(author(), 10, "x".repeat(600));

        let relayed = pipeline.to_virtual_paradise(&message).await.unwrap();
        let sizes: Vec<_> = relayed.iter().map(|m| m.content.len()).collect();
        assert_eq!(sizes, [255, 255, 90]);
        assert!(relayed.iter().all(|m| m.author.as_deref() == Some("Case")));
    }

    #[tokio::test]
    async fn test_to_virtual_paradise_attachments() {
        let pipeline = pipeline(Config::default());
        let message = InboundMessage::new(author(), 10, "look")
            .attachment("https://cdn.example/a.png")
            .attachment("https://cdn.example/b.png");

        let relayed = pipeline.to_virtual_paradise(&message).await.unwrap();
        assert_eq!(
            relayed[0].content,
            "look\nhttps://cdn.example/a.png\nhttps://cdn.example/b.png"
        );
    }

    #[tokio::test]
    async fn test_attachment_only_message() {
        let pipeline = pipeline(Config::default());
        let message = InboundMessage::new(author(), 10, "").attachment("https://cdn.example/a.png");

        let relayed = pipeline.to_virtual_paradise(&message).await.unwrap();
        assert_eq!(relayed[0].content, "https://cdn.example/a.png");
    }

    #[tokio::test]
    async fn test_attachments_disabled() {
        let mut config = Config::default();
        config.relay.include_attachments = false;
        let pipeline = pipeline(config);
        let message = InboundMessage::new(author(), 10, "look").attachment("https://cdn.example/a.png");

        let relayed = pipeline.to_virtual_paradise(&message).await.unwrap();
        assert_eq!(relayed[0].content, "look");
    }

    #[tokio::test]
    async fn test_empty_content_yields_nothing() {
        let pipeline = pipeline(Config::default());
        let message = InboundMessage::new(author(), 10, "   ");
        assert!(pipeline.to_virtual_paradise(&message).await.unwrap().is_empty());
    }

    #[test]
    fn test_author_name_policy_and_bots() {
        let mut config = Config::default();
        config.relay.display_name_order = vec![NameSource::Username];
        let pipeline = pipeline(config);

        assert_eq!(pipeline.author_name(&author()), "casey");
        assert_eq!(
            pipeline.author_name(&Member::new(2, "helper").bot(true)),
            "[helper]"
        );
    }

    #[test]
    fn test_to_discord() {
        let message = RelayedMessage::from_author("Avery", "hello");
        assert_eq!(to_discord(&message), "**Avery**: hello");

        let anonymous = RelayedMessage::new(None, "system notice".to_string(), false);
        assert_eq!(to_discord(&anonymous), "system notice");
    }
}
