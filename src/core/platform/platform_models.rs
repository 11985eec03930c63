use serde::{Deserialize, Serialize};

/// A user account as seen by the moderation core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: u64,
    pub name: String,
    /// Automated (non-human) account.
    pub bot: bool,
}

impl UserRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bot: false,
        }
    }

    pub fn bot(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bot: true,
        }
    }
}

/// A user's presence within one guild. Warnings accumulate per member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub guild_id: u64,
    pub user: UserRef,
}

impl MemberRef {
    pub fn new(guild_id: u64, user: UserRef) -> Self {
        Self { guild_id, user }
    }
}

/// One inbound guild message, captured for a single evaluation.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub guild_id: u64,
    pub channel_id: u64,
    pub content: String,
    pub author: UserRef,
    /// The author's guild membership, when the platform resolved it.
    pub member: Option<MemberRef>,
}
