// Auto-moderation service - evaluates messages against a guild's policies.
//
// For each message:
// - Load the guild's configuration (fresh every time, settings can change)
// - Run the active validators in configured order
// - Stop at the first violation and enforce it (delete, warn)
//
// NO Discord dependencies here - platform actions go through `PlatformActions`.

use super::automod_models::{
    AutoModConfig, Enforcement, GuildConfig, ModerationOutcome, ValidationOutcome, Violation,
};
use super::registry::ValidatorRegistry;
use crate::core::platform::{Message, PlatformActions, PlatformError};
use crate::core::storage::StoreError;
use crate::core::warnings::{MemberStore, WarningError, WarningService};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum AutoModError {
    #[error("Configuration error: {0}")]
    Config(StoreError),

    #[error("Warning failed: {0}")]
    Warning(#[from] WarningError),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for loading and saving guild configuration.
#[async_trait]
pub trait GuildConfigStore: Send + Sync {
    /// Latest saved configuration, or the defaults if the guild never saved one.
    async fn get_config(&self, guild_id: u64) -> Result<GuildConfig, StoreError>;

    async fn save_config(&self, config: GuildConfig) -> Result<(), StoreError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct AutoModService<C: GuildConfigStore, M: MemberStore, P: PlatformActions> {
    registry: Arc<ValidatorRegistry>,
    configs: Arc<C>,
    warnings: Arc<WarningService<M, P>>,
    platform: Arc<P>,
}

impl<C: GuildConfigStore, M: MemberStore, P: PlatformActions> AutoModService<C, M, P> {
    pub fn new(
        registry: Arc<ValidatorRegistry>,
        configs: Arc<C>,
        warnings: Arc<WarningService<M, P>>,
        platform: Arc<P>,
    ) -> Self {
        Self {
            registry,
            configs,
            warnings,
            platform,
        }
    }

    /// Check a message against its guild's current configuration.
    pub async fn check_message(
        &self,
        message: &Message,
    ) -> Result<ModerationOutcome, AutoModError> {
        let config = self
            .configs
            .get_config(message.guild_id)
            .await
            .map_err(AutoModError::Config)?;

        self.evaluate(message, &config).await
    }

    /// Run the configured policies over a message, in order.
    ///
    /// The first violation wins: it is enforced and returned, and no later
    /// policy is evaluated. Policies without a registered validator are skipped.
    pub async fn evaluate(
        &self,
        message: &Message,
        config: &GuildConfig,
    ) -> Result<ModerationOutcome, AutoModError> {
        for policy in &config.auto_mod.filters {
            let Some(validator) = self.registry.lookup(policy) else {
                tracing::debug!(
                    guild_id = message.guild_id,
                    %policy,
                    "No validator registered for policy, skipping"
                );
                continue;
            };

            match validator.validate(&message.content, config) {
                ValidationOutcome::Pass => continue,
                ValidationOutcome::Violation(violation) => {
                    tracing::info!(
                        guild_id = message.guild_id,
                        channel_id = message.channel_id,
                        user_id = message.author.id,
                        policy = %violation.policy,
                        "Message violated auto-mod policy"
                    );

                    let enforcement = self.enforce(message, &config.auto_mod, &violation).await?;
                    return Ok(ModerationOutcome::Violation {
                        violation,
                        enforcement,
                    });
                }
            }
        }

        Ok(ModerationOutcome::Pass)
    }

    /// Apply the configured enforcement actions for a violation.
    async fn enforce(
        &self,
        message: &Message,
        settings: &AutoModConfig,
        violation: &Violation,
    ) -> Result<Enforcement, AutoModError> {
        let mut enforcement = Enforcement::default();

        if settings.auto_delete_messages {
            match self
                .platform
                .delete_message(message, &violation.reason)
                .await
            {
                Ok(()) => enforcement.deleted = true,
                Err(PlatformError::PermissionDenied) => {
                    tracing::warn!(
                        guild_id = message.guild_id,
                        channel_id = message.channel_id,
                        "Missing permissions to delete auto-mod violation"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        guild_id = message.guild_id,
                        message_id = message.id,
                        "Failed to delete auto-mod violation: {}",
                        e
                    );
                }
            }
        }

        if settings.auto_warn_users {
            match (&message.member, self.platform.current_user()) {
                (Some(member), Some(bot)) => {
                    let count = self
                        .warnings
                        .warn(member, &bot, Some(&violation.reason))
                        .await?;
                    enforcement.warnings = Some(count);
                }
                _ => {
                    tracing::debug!(
                        guild_id = message.guild_id,
                        user_id = message.author.id,
                        "Cannot resolve member or bot identity, skipping auto-warn"
                    );
                }
            }
        }

        Ok(enforcement)
    }

    /// Get the current config for a guild.
    pub async fn get_config(&self, guild_id: u64) -> Result<GuildConfig, AutoModError> {
        self.configs
            .get_config(guild_id)
            .await
            .map_err(AutoModError::Config)
    }

    /// Modify a guild's auto-mod settings and save them. Returns the saved config.
    pub async fn update_config(
        &self,
        guild_id: u64,
        update: impl FnOnce(&mut AutoModConfig) + Send,
    ) -> Result<GuildConfig, AutoModError> {
        let mut config = self.get_config(guild_id).await?;
        update(&mut config.auto_mod);
        self.configs
            .save_config(config.clone())
            .await
            .map_err(AutoModError::Config)?;
        Ok(config)
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    pub fn warnings(&self) -> &WarningService<M, P> {
        &self.warnings
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automod::validators::ContentValidator;
    use crate::core::automod::PolicyKind;
    use crate::core::events::{ModerationEvent, ModerationEventBus};
    use crate::core::platform::{MemberRef, UserRef};
    use crate::core::test_support::{MockConfigStore, MockMemberStore, RecordingPlatform, BOT_ID};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GUILD_ID: u64 = 456;
    const AUTHOR_ID: u64 = 123;

    /// Validator with a fixed verdict that counts how often it runs.
    struct ScriptedValidator {
        policy: PolicyKind,
        violates: bool,
        calls: Arc<AtomicUsize>,
    }

    impl ContentValidator for ScriptedValidator {
        fn policy(&self) -> PolicyKind {
            self.policy.clone()
        }

        fn validate(&self, _content: &str, _config: &GuildConfig) -> ValidationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.violates {
                self.violation(format!("{} tripped", self.policy))
            } else {
                ValidationOutcome::Pass
            }
        }
    }

    struct Harness {
        service: AutoModService<MockConfigStore, MockMemberStore, RecordingPlatform>,
        configs: Arc<MockConfigStore>,
        members: Arc<MockMemberStore>,
        platform: Arc<RecordingPlatform>,
        events: ModerationEventBus,
    }

    fn harness(registry: ValidatorRegistry, platform: RecordingPlatform) -> Harness {
        let configs = Arc::new(MockConfigStore::new());
        let members = Arc::new(MockMemberStore::new());
        let platform = Arc::new(platform);
        let events = ModerationEventBus::default();
        let warnings = Arc::new(WarningService::new(
            Arc::clone(&members),
            Arc::clone(&platform),
            events.clone(),
        ));
        let service = AutoModService::new(
            Arc::new(registry),
            Arc::clone(&configs),
            warnings,
            Arc::clone(&platform),
        );

        Harness {
            service,
            configs,
            members,
            platform,
            events,
        }
    }

    fn message(content: &str) -> Message {
        let author = UserRef::new(AUTHOR_ID, "author");
        Message {
            id: 1,
            guild_id: GUILD_ID,
            channel_id: 789,
            content: content.to_string(),
            member: Some(MemberRef::new(GUILD_ID, author.clone())),
            author,
        }
    }

    fn config(filters: Vec<PolicyKind>, delete: bool, warn: bool) -> GuildConfig {
        let mut config = GuildConfig::new(GUILD_ID);
        config.auto_mod.set_filters(filters);
        config.auto_mod.auto_delete_messages = delete;
        config.auto_mod.auto_warn_users = warn;
        config.auto_mod.ban_words = vec!["idiot".to_string()];
        config
    }

    fn scripted(verdicts: &[(PolicyKind, bool)]) -> (ValidatorRegistry, Vec<Arc<AtomicUsize>>) {
        let mut validators: Vec<Box<dyn ContentValidator>> = Vec::new();
        let mut counters = Vec::new();
        for (policy, violates) in verdicts {
            let calls = Arc::new(AtomicUsize::new(0));
            counters.push(Arc::clone(&calls));
            validators.push(Box::new(ScriptedValidator {
                policy: policy.clone(),
                violates: *violates,
                calls,
            }));
        }
        (ValidatorRegistry::new(validators), counters)
    }

    #[tokio::test]
    async fn test_first_violation_in_order_wins() {
        let (registry, calls) = scripted(&[
            (PolicyKind::BadWord, false),
            (PolicyKind::Emoji, false),
            (PolicyKind::MassCaps, true),
            (PolicyKind::Zalgo, true),
        ]);
        let h = harness(registry, RecordingPlatform::new());
        let cfg = config(
            vec![
                PolicyKind::BadWord,
                PolicyKind::Emoji,
                PolicyKind::MassCaps,
                PolicyKind::Zalgo,
            ],
            false,
            false,
        );

        let outcome = h.service.evaluate(&message("hi"), &cfg).await.unwrap();

        assert_eq!(outcome.violation().unwrap().policy, PolicyKind::MassCaps);
        let counts: Vec<usize> = calls.iter().map(|c| c.load(Ordering::SeqCst)).collect();
        assert_eq!(counts, vec![1, 1, 1, 0]);
    }

    #[tokio::test]
    async fn test_configured_order_is_priority_not_registry_order() {
        let (registry, calls) = scripted(&[(PolicyKind::BadWord, true), (PolicyKind::Zalgo, true)]);
        let h = harness(registry, RecordingPlatform::new());
        let cfg = config(vec![PolicyKind::Zalgo, PolicyKind::BadWord], false, false);

        let outcome = h.service.evaluate(&message("hi"), &cfg).await.unwrap();

        assert_eq!(outcome.violation().unwrap().policy, PolicyKind::Zalgo);
        assert_eq!(calls[0].load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clean_message_has_no_side_effects() {
        let h = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        let mut rx = h.events.subscribe();
        let cfg = config(PolicyKind::ALL.to_vec(), true, true);

        let outcome = h
            .service
            .evaluate(&message("Hello there, how is everyone doing?"), &cfg)
            .await
            .unwrap();

        assert_eq!(outcome, ModerationOutcome::Pass);
        assert!(h.platform.deletions().is_empty());
        assert!(h.platform.direct_messages().is_empty());
        assert_eq!(h.members.save_calls(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_violation_without_enforcement() {
        let h = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        let mut rx = h.events.subscribe();
        let cfg = config(vec![PolicyKind::BadWord], false, false);

        let outcome = h.service.evaluate(&message("you idiot"), &cfg).await.unwrap();

        match outcome {
            ModerationOutcome::Violation {
                violation,
                enforcement,
            } => {
                assert_eq!(violation.policy, PolicyKind::BadWord);
                assert_eq!(enforcement, Enforcement::default());
            }
            ModerationOutcome::Pass => panic!("expected a violation"),
        }
        assert!(h.platform.deletions().is_empty());
        assert_eq!(h.members.save_calls(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_bad_word_scenario_deletes_and_warns() {
        let h = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        let mut rx = h.events.subscribe();
        let cfg = config(vec![PolicyKind::BadWord, PolicyKind::MassCaps], true, true);
        let msg = message("YOU IDIOT");

        let outcome = h.service.evaluate(&msg, &cfg).await.unwrap();

        let ModerationOutcome::Violation {
            violation,
            enforcement,
        } = outcome
        else {
            panic!("expected a violation");
        };
        assert_eq!(violation.policy, PolicyKind::BadWord);
        assert!(enforcement.deleted);
        assert_eq!(enforcement.warnings, Some(1));

        let deletions = h.platform.deletions();
        assert_eq!(deletions.len(), 1);
        assert!(deletions[0].1.contains("idiot"));

        let record = h.members.get_member(msg.member.as_ref().unwrap()).await.unwrap();
        assert_eq!(record.warning_count(), 1);
        assert_eq!(record.warnings[0].reason, violation.reason);
        assert_eq!(record.warnings[0].instigator_id, BOT_ID);

        let ModerationEvent::UserWarn(event) = rx.try_recv().unwrap();
        assert_eq!(event.warnings, 1);
        assert_eq!(event.user.id, AUTHOR_ID);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_emoji_only_config_passes_plain_text() {
        let h = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        let cfg = config(vec![PolicyKind::Emoji], true, true);

        let outcome = h.service.evaluate(&message("no emoji here"), &cfg).await.unwrap();

        assert_eq!(outcome, ModerationOutcome::Pass);
        assert!(h.platform.deletions().is_empty());
        assert_eq!(h.members.save_calls(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_policy_is_skipped() {
        let h = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        let cfg = config(
            vec![PolicyKind::parse("LinkSpam2"), PolicyKind::BadWord],
            false,
            false,
        );

        let outcome = h.service.evaluate(&message("idiot"), &cfg).await.unwrap();

        assert_eq!(outcome.violation().unwrap().policy, PolicyKind::BadWord);
    }

    #[tokio::test]
    async fn test_denied_delete_still_warns() {
        let h = harness(
            ValidatorRegistry::standard(),
            RecordingPlatform::new().with_denied_deletes(),
        );
        let cfg = config(vec![PolicyKind::BadWord], true, true);

        let outcome = h.service.evaluate(&message("idiot"), &cfg).await.unwrap();

        let ModerationOutcome::Violation { enforcement, .. } = outcome else {
            panic!("expected a violation");
        };
        assert!(!enforcement.deleted);
        assert_eq!(enforcement.warnings, Some(1));
    }

    #[tokio::test]
    async fn test_warn_skipped_without_member_or_bot_identity() {
        let h = harness(
            ValidatorRegistry::standard(),
            RecordingPlatform::new().without_identity(),
        );
        let cfg = config(vec![PolicyKind::BadWord], false, true);

        let outcome = h.service.evaluate(&message("idiot"), &cfg).await.unwrap();
        assert!(outcome.is_violation());

        let mut no_member = message("idiot");
        no_member.member = None;
        let h2 = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        let outcome = h2.service.evaluate(&no_member, &cfg).await.unwrap();
        assert!(outcome.is_violation());

        assert_eq!(h.members.save_calls(), 0);
        assert_eq!(h2.members.save_calls(), 0);
    }

    #[tokio::test]
    async fn test_warn_store_failure_is_surfaced() {
        let h = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        h.members.fail_saves();
        let cfg = config(vec![PolicyKind::BadWord], true, true);

        let err = h.service.evaluate(&message("idiot"), &cfg).await.unwrap_err();

        assert!(matches!(err, AutoModError::Warning(WarningError::Store(_))));
        // Deletion already happened and is not rolled back
        assert_eq!(h.platform.deletions().len(), 1);
    }

    #[tokio::test]
    async fn test_check_message_reads_latest_config() {
        let h = harness(ValidatorRegistry::standard(), RecordingPlatform::new());
        let msg = message("idiot");

        // Defaults have no filters
        assert_eq!(h.service.check_message(&msg).await.unwrap(), ModerationOutcome::Pass);

        h.service
            .update_config(GUILD_ID, |auto_mod| {
                auto_mod.set_filters(vec![PolicyKind::BadWord]);
                auto_mod.ban_words.push("idiot".to_string());
                auto_mod.auto_delete_messages = false;
            })
            .await
            .unwrap();

        assert!(h.service.check_message(&msg).await.unwrap().is_violation());
        assert_eq!(h.configs.read_calls(), 3);
    }
}
