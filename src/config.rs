//! Bridge configuration.
//!
//! Loaded from a TOML file. Every field has a default, so an empty or
//! missing file yields a working configuration.
//!
//! ```toml
//! [bot]
//! relay_bot_messages = false
//!
//! [discord]
//! channel_id = 1234567890
//!
//! [relay]
//! display_name_order = ["global_name", "username"]
//!
//! [chat]
//! color = 0x191970
//! reply_style = "italic"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::chunking::{ByteChunker, MIN_SEGMENT_BYTES};
use crate::core::MAX_SEGMENT_BYTES;
use crate::directory::{DisplayNamePolicy, NameSource};
use crate::error::{ConfigError, IoError, Result};

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "data/config.toml";

/// Environment variable overriding the configuration path.
pub const CONFIG_ENV: &str = "VPLINK_CONFIG";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bot behaviour.
    pub bot: BotConfig,
    /// Discord side.
    pub discord: DiscordConfig,
    /// Relay pipeline.
    pub relay: RelayConfig,
    /// Virtual Paradise chat appearance.
    pub chat: ChatConfig,
}

/// Bot behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Relay messages written by bots.
    pub relay_bot_messages: bool,
    /// Announce avatars entering and leaving the world.
    pub announce_avatar_events: bool,
    /// Include bot avatars in announcements.
    pub announce_bots: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            relay_bot_messages: false,
            announce_avatar_events: true,
            announce_bots: false,
        }
    }
}

/// Discord side settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bridged channel. `0` accepts every channel.
    pub channel_id: u64,
}

impl DiscordConfig {
    /// Checks whether messages from `channel_id` are bridged.
    #[must_use]
    pub const fn accepts_channel(&self, channel_id: u64) -> bool {
        self.channel_id == 0 || self.channel_id == channel_id
    }
}

/// Relay pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Byte budget of one outbound chat message.
    pub max_segment_bytes: usize,
    /// Precedence of member names.
    pub display_name_order: Vec<NameSource>,
    /// Append attachment URLs to relayed content.
    pub include_attachments: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_segment_bytes: MAX_SEGMENT_BYTES,
            display_name_order: DisplayNamePolicy::default().order().to_vec(),
            include_attachments: true,
        }
    }
}

/// Font style of a Virtual Paradise chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    /// Plain text.
    #[default]
    Regular,
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// Bold and italic text.
    BoldItalic,
}

/// Color and style pair applied to one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatStyle {
    /// RGB color.
    pub color: u32,
    /// Font style.
    pub style: FontStyle,
}

/// Virtual Paradise chat appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// RGB color of regular messages.
    pub color: u32,
    /// Font style of regular messages.
    pub style: FontStyle,
    /// RGB color of replies.
    pub reply_color: u32,
    /// Font style of replies.
    pub reply_style: FontStyle,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            color: 0x19_19_70,
            style: FontStyle::Regular,
            reply_color: 0x80_80_80,
            reply_style: FontStyle::Italic,
        }
    }
}

impl ChatConfig {
    /// Picks the appearance for a message.
    #[must_use]
    pub const fn style_for(&self, is_reply: bool) -> ChatStyle {
        if is_reply {
            ChatStyle {
                color: self.reply_color,
                style: self.reply_style,
            }
        } else {
            ChatStyle {
                color: self.color,
                style: self.style,
            }
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration file at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// validated.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path).map_err(|e| IoError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml(&source)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Checks value ranges and consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        let max = self.relay.max_segment_bytes;
        if !(MIN_SEGMENT_BYTES..=MAX_SEGMENT_BYTES).contains(&max) {
            return Err(ConfigError::InvalidValue {
                key: "relay.max_segment_bytes".to_string(),
                reason: format!(
                    "must be between {MIN_SEGMENT_BYTES} and {MAX_SEGMENT_BYTES}, got {max}"
                ),
            }
            .into());
        }

        for (key, color) in [
            ("chat.color", self.chat.color),
            ("chat.reply_color", self.chat.reply_color),
        ] {
            if color > 0xFF_FF_FF {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("{color:#x} is not a 24-bit RGB value"),
                }
                .into());
            }
        }

        self.display_name_policy()?;
        Ok(())
    }

    /// Builds the display-name policy from `relay.display_name_order`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the order is empty or has
    /// duplicates.
    pub fn display_name_policy(&self) -> Result<DisplayNamePolicy> {
        Ok(DisplayNamePolicy::new(
            self.relay.display_name_order.clone(),
        )?)
    }

    /// Builds the chunker for `relay.max_segment_bytes`.
    #[must_use]
    pub const fn chunker(&self) -> ByteChunker {
        ByteChunker::with_limit(self.relay.max_segment_bytes)
    }
}
