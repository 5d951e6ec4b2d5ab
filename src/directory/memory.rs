//! In-memory directory backed by a snapshot of guild data.
//!
//! Useful for the CLI and for tests, and as the shape a gateway cache would
//! hand to the relay.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::traits::{Channel, Directory, Member, Role};
use crate::error::{DirectoryError, IoError, Result};

/// Serialized form of a directory, as stored in a JSON snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    /// Guild roles.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Guild members.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Text channels.
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// Directory holding every record in memory.
///
/// # Examples
///
/// ```
/// use vplink::directory::{Directory, Member, MemoryDirectory};
///
/// let directory = MemoryDirectory::new().with_member(Member::new(7, "avery"));
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let member = rt.block_on(directory.find_member(7)).unwrap();
/// assert_eq!(member.unwrap().username, "avery");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    roles: HashMap<u64, Role>,
    members: HashMap<u64, Member>,
    channels: HashMap<u64, Channel>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from a snapshot. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Self {
        Self {
            roles: snapshot.roles.into_iter().map(|r| (r.id, r)).collect(),
            members: snapshot.members.into_iter().map(|m| (m.id, m)).collect(),
            channels: snapshot.channels.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Parses a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Snapshot`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: DirectorySnapshot =
            serde_json::from_str(json).map_err(DirectoryError::from)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Loads a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| IoError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Adds a role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role.id, role);
        self
    }

    /// Adds a member.
    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.insert(member.id, member);
        self
    }

    /// Adds a channel.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel.id, channel);
        self
    }

    /// Finds a member by account name.
    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<&Member> {
        self.members.values().find(|m| m.username == username)
    }

    /// Returns the total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len() + self.members.len() + self.channels.len()
    }

    /// Checks if the directory holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn find_role(&self, id: u64) -> std::result::Result<Option<Role>, DirectoryError> {
        Ok(self.roles.get(&id).cloned())
    }

    async fn find_member(&self, id: u64) -> std::result::Result<Option<Member>, DirectoryError> {
        Ok(self.members.get(&id).cloned())
    }

    async fn find_channel(&self, id: u64) -> std::result::Result<Option<Channel>, DirectoryError> {
        Ok(self.channels.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "roles": [{"id": 10, "name": "Moderators"}],
        "members": [{"id": 123456789012345678, "username": "avery", "global_name": "Avery"}],
        "channels": [{"id": 30, "name": "general"}]
    }"#;

    #[tokio::test]
    async fn test_from_json_lookups() {
        let directory = MemoryDirectory::from_json(SNAPSHOT).unwrap();
        assert_eq!(directory.len(), 3);

        let role = directory.find_role(10).await.unwrap().unwrap();
        assert_eq!(role.name, "Moderators");

        let member = directory
            .find_member(123_456_789_012_345_678)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.global_name.as_deref(), Some("Avery"));
        assert!(!member.bot);

        let channel = directory.find_channel(30).await.unwrap().unwrap();
        assert_eq!(channel.name, "general");
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let directory = MemoryDirectory::new();
        assert!(directory.is_empty());
        assert!(directory.find_role(1).await.unwrap().is_none());
        assert!(directory.find_member(1).await.unwrap().is_none());
        assert!(directory.find_channel(1).await.unwrap().is_none());
    }

    #[test]
    fn test_find_by_username() {
        let directory = MemoryDirectory::from_json(SNAPSHOT).unwrap();
        let member = directory.find_by_username("avery").unwrap();
        assert_eq!(member.id, 123_456_789_012_345_678);
        assert!(directory.find_by_username("nobody").is_none());
    }

    #[test]
    fn test_from_json_partial_snapshot() {
        let directory = MemoryDirectory::from_json(r#"{"channels": []}"#).unwrap();
        assert!(directory.is_empty());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = MemoryDirectory::from_json("not json").unwrap_err();
        assert!(matches!(
            err,
            Error::Directory(DirectoryError::Snapshot(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        let directory = MemoryDirectory::load(file.path()).unwrap();
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MemoryDirectory::load(Path::new("/nonexistent/directory.json")).unwrap_err();
        assert!(matches!(err, Error::Io(IoError::ReadFailed { .. })));
    }
}
