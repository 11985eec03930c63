// Test doubles for the core ports.

use crate::core::automod::{GuildConfig, GuildConfigStore};
use crate::core::platform::{MemberRef, Message, PlatformActions, PlatformError, UserRef};
use crate::core::storage::StoreError;
use crate::core::warnings::{MemberRecord, MemberStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const BOT_ID: u64 = 999;

/// Member store that relies on the trait's default `append_warning`.
pub struct MockMemberStore {
    records: DashMap<(u64, u64), MemberRecord>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MockMemberStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            saves: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn save_calls(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MemberStore for MockMemberStore {
    async fn get_member(&self, member: &MemberRef) -> Result<MemberRecord, StoreError> {
        Ok(self
            .records
            .get(&(member.guild_id, member.user.id))
            .map(|r| r.clone())
            .unwrap_or_else(|| MemberRecord::new(member)))
    }

    async fn save_member(&self, record: MemberRecord) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("disk full".to_string()));
        }
        self.records
            .insert((record.guild_id, record.user_id), record);
        Ok(())
    }
}

pub struct MockConfigStore {
    configs: DashMap<u64, GuildConfig>,
    reads: AtomicUsize,
}

impl MockConfigStore {
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn read_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GuildConfigStore for MockConfigStore {
    async fn get_config(&self, guild_id: u64) -> Result<GuildConfig, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .configs
            .get(&guild_id)
            .map(|c| c.clone())
            .unwrap_or_else(|| GuildConfig::new(guild_id)))
    }

    async fn save_config(&self, config: GuildConfig) -> Result<(), StoreError> {
        self.configs.insert(config.guild_id, config);
        Ok(())
    }
}

/// Platform that records every action instead of performing it.
pub struct RecordingPlatform {
    current_user: Option<UserRef>,
    deletions: Mutex<Vec<(u64, String)>>,
    direct_messages: Mutex<Vec<(u64, String)>>,
    deny_deletes: bool,
    closed_dms: bool,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            current_user: Some(UserRef::bot(BOT_ID, "automod")),
            deletions: Mutex::new(Vec::new()),
            direct_messages: Mutex::new(Vec::new()),
            deny_deletes: false,
            closed_dms: false,
        }
    }

    pub fn without_identity(mut self) -> Self {
        self.current_user = None;
        self
    }

    pub fn with_denied_deletes(mut self) -> Self {
        self.deny_deletes = true;
        self
    }

    pub fn with_closed_dms(mut self) -> Self {
        self.closed_dms = true;
        self
    }

    /// (message id, reason) for every deletion request
    pub fn deletions(&self) -> Vec<(u64, String)> {
        self.deletions.lock().unwrap().clone()
    }

    /// (user id, text) for every delivered DM
    pub fn direct_messages(&self) -> Vec<(u64, String)> {
        self.direct_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformActions for RecordingPlatform {
    fn current_user(&self) -> Option<UserRef> {
        self.current_user.clone()
    }

    async fn delete_message(&self, message: &Message, reason: &str) -> Result<(), PlatformError> {
        if self.deny_deletes {
            return Err(PlatformError::PermissionDenied);
        }
        self.deletions
            .lock()
            .unwrap()
            .push((message.id, reason.to_string()));
        Ok(())
    }

    async fn send_direct_message(&self, user: &UserRef, text: &str) -> Result<(), PlatformError> {
        if self.closed_dms {
            return Err(PlatformError::PermissionDenied);
        }
        self.direct_messages
            .lock()
            .unwrap()
            .push((user.id, text.to_string()));
        Ok(())
    }
}
