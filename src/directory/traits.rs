//! Directory trait and record types.
//!
//! The directory resolves numeric Discord snowflakes to the names shown in
//! Virtual Paradise. Lookups may need a gateway or REST round trip, so the
//! trait is asynchronous.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DirectoryError};

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role snowflake.
    pub id: u64,
    /// Role name.
    pub name: String,
}

/// A text channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel snowflake.
    pub id: u64,
    /// Channel name, without the leading `#`.
    pub name: String,
}

/// A guild member with every name Discord may display for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// User snowflake.
    pub id: u64,
    /// Unique account name.
    pub username: String,
    /// Profile-wide display name.
    #[serde(default)]
    pub global_name: Option<String>,
    /// Guild-specific nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl Member {
    /// Creates a member known only by account name.
    #[must_use]
    pub fn new(id: u64, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            global_name: None,
            nickname: None,
            bot: false,
        }
    }

    /// Sets the profile-wide display name.
    #[must_use]
    pub fn global_name(mut self, name: &str) -> Self {
        self.global_name = Some(name.to_string());
        self
    }

    /// Sets the guild nickname.
    #[must_use]
    pub fn nickname(mut self, name: &str) -> Self {
        self.nickname = Some(name.to_string());
        self
    }

    /// Marks the member as a bot account.
    #[must_use]
    pub const fn bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }

    /// Returns the name selected by `policy`.
    #[must_use]
    pub fn display_name(&self, policy: &DisplayNamePolicy) -> &str {
        policy.select(self)
    }
}

/// One of the names a member can be displayed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    /// Guild nickname.
    Nickname,
    /// Profile-wide display name.
    GlobalName,
    /// Account name (always present).
    Username,
}

impl NameSource {
    fn pick(self, member: &Member) -> Option<&str> {
        match self {
            Self::Nickname => member.nickname.as_deref(),
            Self::GlobalName => member.global_name.as_deref(),
            Self::Username => Some(member.username.as_str()),
        }
    }
}

/// Ordered precedence of member names.
///
/// The first source that is set wins; the account name is the final
/// fallback even when it is not listed.
///
/// # Examples
///
/// ```
/// use vplink::directory::{DisplayNamePolicy, Member};
///
/// let member = Member::new(1, "avery_01").global_name("Avery");
/// assert_eq!(member.display_name(&DisplayNamePolicy::default()), "Avery");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayNamePolicy {
    order: Vec<NameSource>,
}

impl Default for DisplayNamePolicy {
    fn default() -> Self {
        Self {
            order: vec![
                NameSource::Nickname,
                NameSource::GlobalName,
                NameSource::Username,
            ],
        }
    }
}

impl DisplayNamePolicy {
    /// Creates a policy from an explicit precedence order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the order is empty or lists a
    /// source twice.
    pub fn new(order: Vec<NameSource>) -> Result<Self, ConfigError> {
        if order.is_empty() {
            return Err(invalid_order("must list at least one name source"));
        }
        for (i, source) in order.iter().enumerate() {
            if order[..i].contains(source) {
                return Err(invalid_order(&format!("{source:?} is listed twice")));
            }
        }
        Ok(Self { order })
    }

    /// Returns the precedence order.
    #[must_use]
    pub fn order(&self) -> &[NameSource] {
        &self.order
    }

    /// Selects a member's display name.
    #[must_use]
    pub fn select<'a>(&self, member: &'a Member) -> &'a str {
        self.order
            .iter()
            .find_map(|source| source.pick(member))
            .unwrap_or(member.username.as_str())
    }
}

fn invalid_order(reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: "relay.display_name_order".to_string(),
        reason: reason.to_string(),
    }
}

/// Read-only lookup capability used to resolve mention tags.
///
/// `Ok(None)` means the ID is unknown. `Err` means the backend could not
/// answer; callers resolving markup treat both the same way and fall back
/// to the literal tag.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Looks up a role by ID.
    async fn find_role(&self, id: u64) -> Result<Option<Role>, DirectoryError>;

    /// Looks up a guild member by user ID.
    async fn find_member(&self, id: u64) -> Result<Option<Member>, DirectoryError>;

    /// Looks up a text channel by ID.
    async fn find_channel(&self, id: u64) -> Result<Option<Channel>, DirectoryError>;
}
