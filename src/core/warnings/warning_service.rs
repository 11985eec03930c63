// Warning service - issues warnings to guild members.
//
// This service handles:
// - Guarding against self-warns and warning bots
// - Appending the warning to the member's record
// - Publishing a `userWarn` event once the warning is stored
// - Telling the member why they were warned (best effort)
//
// Escalation (mute, kick, ...) is left to whoever listens to the events.

use super::warning_models::{MemberRecord, PunishmentEvent, Warning};
use crate::core::events::{ModerationEvent, ModerationEventBus};
use crate::core::platform::{MemberRef, PlatformActions, UserRef};
use crate::core::storage::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_WARN_REASON: &str = "No reason specified.";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum WarningError {
    #[error("You cannot warn yourself.")]
    CannotWarnSelf,

    #[error("Bots cannot be warned.")]
    CannotWarnBot,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WarningError {
    /// Misuse of the warn operation. Never worth retrying.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, WarningError::CannotWarnSelf | WarningError::CannotWarnBot)
    }
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting member moderation records.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Fetch a member's record. Members with no record get an empty one.
    async fn get_member(&self, member: &MemberRef) -> Result<MemberRecord, StoreError>;

    /// Persist a member's record.
    async fn save_member(&self, record: MemberRecord) -> Result<(), StoreError>;

    /// Append a warning and return the member's new warning count.
    ///
    /// The default reads, appends and saves. Stores that can append atomically
    /// should override it so concurrent warns don't lose entries.
    async fn append_warning(
        &self,
        member: &MemberRef,
        warning: Warning,
    ) -> Result<usize, StoreError> {
        let mut record = self.get_member(member).await?;
        record.warnings.push(warning);
        let count = record.warning_count();
        self.save_member(record).await?;
        Ok(count)
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct WarningService<M: MemberStore, P: PlatformActions> {
    store: Arc<M>,
    platform: Arc<P>,
    events: ModerationEventBus,
}

impl<M: MemberStore, P: PlatformActions> WarningService<M, P> {
    pub fn new(store: Arc<M>, platform: Arc<P>, events: ModerationEventBus) -> Self {
        Self {
            store,
            platform,
            events,
        }
    }

    /// Warn a member and return their new warning count.
    ///
    /// A blank or missing reason falls back to [`DEFAULT_WARN_REASON`].
    /// Failing to DM the member does not fail the warn.
    pub async fn warn(
        &self,
        member: &MemberRef,
        instigator: &UserRef,
        reason: Option<&str>,
    ) -> Result<usize, WarningError> {
        if member.user.id == instigator.id {
            return Err(WarningError::CannotWarnSelf);
        }
        if member.user.bot {
            return Err(WarningError::CannotWarnBot);
        }

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_WARN_REASON)
            .to_string();

        let warning = Warning {
            reason: reason.clone(),
            instigator_id: instigator.id,
            at: Utc::now(),
        };
        let warnings = self.store.append_warning(member, warning).await?;

        tracing::info!(
            guild_id = member.guild_id,
            user_id = member.user.id,
            instigator_id = instigator.id,
            warnings,
            "Member warned"
        );

        self.events.publish(ModerationEvent::UserWarn(PunishmentEvent {
            guild_id: member.guild_id,
            instigator: instigator.clone(),
            user: member.user.clone(),
            reason: reason.clone(),
            warnings,
        }));

        let notice = format!("<@{}> warned you for `{}`", instigator.id, reason);
        if let Err(e) = self
            .platform
            .send_direct_message(&member.user, &notice)
            .await
        {
            tracing::debug!(user_id = member.user.id, "Could not DM warned member: {}", e);
        }

        Ok(warnings)
    }

    /// All warnings on record for a member, oldest first.
    pub async fn warnings(&self, member: &MemberRef) -> Result<Vec<Warning>, WarningError> {
        Ok(self.store.get_member(member).await?.warnings)
    }
}

// ============================================================================
// TESTS
// ============================================================================
