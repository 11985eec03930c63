// In-memory implementation of the guild config and member stores.
//
// Useful for tests and for running the bot without a database file.
// Nothing survives a restart.

use crate::core::automod::{GuildConfig, GuildConfigStore};
use crate::core::platform::MemberRef;
use crate::core::storage::StoreError;
use crate::core::warnings::{MemberRecord, MemberStore, Warning};
use async_trait::async_trait;
use dashmap::DashMap;

/// A composite key for member records.
/// We need both guild_id AND user_id since users can be in multiple guilds.
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
struct MemberKey {
    guild_id: u64,
    user_id: u64,
}

impl From<&MemberRef> for MemberKey {
    fn from(member: &MemberRef) -> Self {
        Self {
            guild_id: member.guild_id,
            user_id: member.user.id,
        }
    }
}

pub struct InMemoryAutoModStore {
    configs: DashMap<u64, GuildConfig>,
    members: DashMap<MemberKey, MemberRecord>,
}

impl InMemoryAutoModStore {
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
            members: DashMap::new(),
        }
    }
}

impl Default for InMemoryAutoModStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GuildConfigStore for InMemoryAutoModStore {
    async fn get_config(&self, guild_id: u64) -> Result<GuildConfig, StoreError> {
        Ok(self
            .configs
            .get(&guild_id)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| GuildConfig::new(guild_id)))
    }

    async fn save_config(&self, config: GuildConfig) -> Result<(), StoreError> {
        self.configs.insert(config.guild_id, config);
        Ok(())
    }
}

#[async_trait]
impl MemberStore for InMemoryAutoModStore {
    async fn get_member(&self, member: &MemberRef) -> Result<MemberRecord, StoreError> {
        if member.user.bot {
            return Err(StoreError::BotAccount(member.user.id));
        }

        Ok(self
            .members
            .get(&MemberKey::from(member))
            .map(|entry| entry.clone())
            .unwrap_or_else(|| MemberRecord::new(member)))
    }

    async fn save_member(&self, record: MemberRecord) -> Result<(), StoreError> {
        let key = MemberKey {
            guild_id: record.guild_id,
            user_id: record.user_id,
        };

        // Hold the entry lock while checking so a concurrent append can't slip in
        let mut entry = self.members.entry(key).or_insert_with(|| MemberRecord {
            guild_id: key.guild_id,
            user_id: key.user_id,
            warnings: Vec::new(),
        });
        if record.warnings.len() < entry.warnings.len() {
            return Err(StoreError::WarningsShrunk(record.user_id));
        }
        *entry = record;
        Ok(())
    }

    async fn append_warning(
        &self,
        member: &MemberRef,
        warning: Warning,
    ) -> Result<usize, StoreError> {
        if member.user.bot {
            return Err(StoreError::BotAccount(member.user.id));
        }

        // entry() locks the shard, so concurrent appends are serialized
        let mut entry = self
            .members
            .entry(MemberKey::from(member))
            .or_insert_with(|| MemberRecord::new(member));
        entry.warnings.push(warning);
        Ok(entry.warning_count())
    }
}
