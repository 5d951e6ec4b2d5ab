//! Avatar presence tracking and arrival/departure announcements.
//!
//! One user can be connected through several sessions under the same
//! name. An arrival is announced only for the first such session, and a
//! departure only when the last one leaves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::config::BotConfig;

/// An avatar present in the Virtual Paradise world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// World session number.
    pub session: u32,
    /// Account ID.
    pub user_id: u64,
    /// Avatar name.
    pub name: String,
    /// Whether the avatar is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl Avatar {
    /// Creates a user avatar.
    #[must_use]
    pub fn new(session: u32, user_id: u64, name: &str) -> Self {
        Self {
            session,
            user_id,
            name: name.to_string(),
            bot: false,
        }
    }

    /// Sets the bot flag.
    #[must_use]
    pub const fn bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.user_id == other.user_id && self.name == other.name
    }
}

/// Text announcing an arrival.
#[must_use]
pub fn arrival_notice(avatar: &Avatar) -> String {
    format!(
        "📥 **Avatar Joined**: {} (User #{})",
        avatar.name, avatar.user_id
    )
}

/// Text announcing a departure.
#[must_use]
pub fn departure_notice(avatar: &Avatar) -> String {
    format!(
        "📤 **Avatar Left**: {} (User #{})",
        avatar.name, avatar.user_id
    )
}

/// Sessions currently present, keyed by session number.
#[derive(Debug, Clone, Default)]
pub struct AvatarRoster {
    sessions: HashMap<u32, Avatar>,
    bot: BotConfig,
}

impl AvatarRoster {
    /// Creates an empty roster with the given announcement settings.
    #[must_use]
    pub fn new(bot: BotConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            bot,
        }
    }

    /// Records an arrival. Returns the announcement, if one is due.
    pub fn joined(&mut self, avatar: Avatar) -> Option<String> {
        info!(avatar = %avatar.name, user = avatar.user_id, session = avatar.session, "avatar joined");

        let first = !self.sessions.values().any(|a| a.same_identity(&avatar));
        let notice = (first && self.announces(&avatar)).then(|| arrival_notice(&avatar));
        self.sessions.insert(avatar.session, avatar);
        notice
    }

    /// Records a departure. Returns the announcement, if one is due.
    ///
    /// Unknown sessions are ignored.
    pub fn left(&mut self, session: u32) -> Option<String> {
        let avatar = self.sessions.remove(&session)?;
        info!(avatar = %avatar.name, user = avatar.user_id, session, "avatar left");

        let last = !self.sessions.values().any(|a| a.same_identity(&avatar));
        (last && self.announces(&avatar)).then(|| departure_notice(&avatar))
    }

    /// Returns the avatar in `session`.
    #[must_use]
    pub fn get(&self, session: u32) -> Option<&Avatar> {
        self.sessions.get(&session)
    }

    /// Returns the number of sessions present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Checks if nobody is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    const fn announces(&self, avatar: &Avatar) -> bool {
        self.bot.announce_avatar_events && (!avatar.bot || self.bot.announce_bots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> AvatarRoster {
        AvatarRoster::new(BotConfig::default())
    }

    #[test]
    fn test_join_and_leave_announced() {
        let mut roster = roster();
        let notice = roster.joined(Avatar::new(1, 100, "Avery"));
        assert_eq!(
            notice.as_deref(),
            Some("📥 **Avatar Joined**: Avery (User #100)")
        );
        assert_eq!(roster.len(), 1);

        let notice = roster.left(1);
        assert_eq!(
            notice.as_deref(),
            Some("📤 **Avatar Left**: Avery (User #100)")
        );
        assert!(roster.is_empty());
    }

    #[test]
    fn test_second_session_is_silent() {
        let mut roster = roster();
        assert!(roster.joined(Avatar::new(1, 100, "Avery")).is_some());
        assert!(roster.joined(Avatar::new(2, 100, "Avery")).is_none());

        assert!(roster.left(1).is_none());
        assert!(roster.left(2).is_some());
    }

    #[test]
    fn test_unknown_session_leave() {
        let mut roster = roster();
        assert!(roster.left(42).is_none());
    }

    #[test]
    fn test_bots_not_announced_by_default() {
        let mut roster = roster();
        assert!(roster.joined(Avatar::new(1, 7, "Helper").bot(true)).is_none());
        assert_eq!(roster.get(1).map(|a| a.name.as_str()), Some("Helper"));
        assert!(roster.left(1).is_none());
    }

    #[test]
    fn test_bots_announced_when_enabled() {
        let mut roster = AvatarRoster::new(BotConfig {
            announce_bots: true,
            ..BotConfig::default()
        });
        assert!(roster.joined(Avatar::new(1, 7, "Helper").bot(true)).is_some());
    }

    #[test]
    fn test_announcements_disabled() {
        let mut roster = AvatarRoster::new(BotConfig {
            announce_avatar_events: false,
            ..BotConfig::default()
        });
        assert!(roster.joined(Avatar::new(1, 100, "Avery")).is_none());
        assert_eq!(roster.len(), 1);
        assert!(roster.left(1).is_none());
    }
}
