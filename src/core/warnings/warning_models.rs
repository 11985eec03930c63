// Warning domain models.

use crate::core::platform::{MemberRef, UserRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One warning issued to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub reason: String,
    pub instigator_id: u64,
    pub at: DateTime<Utc>,
}

/// A member's moderation record. Warnings are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub guild_id: u64,
    pub user_id: u64,
    pub warnings: Vec<Warning>,
}

impl MemberRecord {
    /// Empty record for a member that has never been warned.
    pub fn new(member: &MemberRef) -> Self {
        Self {
            guild_id: member.guild_id,
            user_id: member.user.id,
            warnings: Vec::new(),
        }
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Broadcast once a warning has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishmentEvent {
    pub guild_id: u64,
    pub instigator: UserRef,
    pub user: UserRef,
    pub reason: String,
    /// The member's warning count including this warning
    pub warnings: usize,
}
