// Runtime-selected store: SQLite on disk, or in memory for throwaway runs.

use super::{InMemoryAutoModStore, SqliteAutoModStore};
use crate::core::automod::{GuildConfig, GuildConfigStore};
use crate::core::platform::MemberRef;
use crate::core::storage::StoreError;
use crate::core::warnings::{MemberRecord, MemberStore, Warning};
use async_trait::async_trait;

pub enum AutoModStore {
    Sqlite(SqliteAutoModStore),
    Memory(InMemoryAutoModStore),
}

impl AutoModStore {
    /// Open (and migrate) the SQLite database at `database_url`.
    pub async fn sqlite(database_url: &str) -> anyhow::Result<Self> {
        Ok(Self::Sqlite(SqliteAutoModStore::new(database_url).await?))
    }

    pub fn memory() -> Self {
        Self::Memory(InMemoryAutoModStore::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl GuildConfigStore for AutoModStore {
    async fn get_config(&self, guild_id: u64) -> Result<GuildConfig, StoreError> {
        match self {
            Self::Sqlite(store) => store.get_config(guild_id).await,
            Self::Memory(store) => store.get_config(guild_id).await,
        }
    }

    async fn save_config(&self, config: GuildConfig) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.save_config(config).await,
            Self::Memory(store) => store.save_config(config).await,
        }
    }
}

#[async_trait]
impl MemberStore for AutoModStore {
    async fn get_member(&self, member: &MemberRef) -> Result<MemberRecord, StoreError> {
        match self {
            Self::Sqlite(store) => store.get_member(member).await,
            Self::Memory(store) => store.get_member(member).await,
        }
    }

    async fn save_member(&self, record: MemberRecord) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.save_member(record).await,
            Self::Memory(store) => store.save_member(record).await,
        }
    }

    // Forwarded so each backend keeps its own atomic append
    async fn append_warning(
        &self,
        member: &MemberRef,
        warning: Warning,
    ) -> Result<usize, StoreError> {
        match self {
            Self::Sqlite(store) => store.append_warning(member, warning).await,
            Self::Memory(store) => store.append_warning(member, warning).await,
        }
    }
}
