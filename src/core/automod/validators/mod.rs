// Content validators - one stateless detector per policy.
//
// Validators never perform I/O and keep no mutable state, so a single
// instance is shared by every concurrent evaluation.

pub mod bad_link;
pub mod bad_word;
pub mod emoji;
pub mod mass_caps;
pub mod mass_mention;
pub mod zalgo;

pub use bad_link::{BadLinkValidator, LinkPattern};
pub use bad_word::BadWordValidator;
pub use emoji::EmojiValidator;
pub use mass_caps::MassCapsValidator;
pub use mass_mention::MassMentionValidator;
pub use zalgo::ZalgoValidator;

use super::automod_models::{GuildConfig, PolicyKind, ValidationOutcome, Violation};

/// Detector for exactly one content policy.
pub trait ContentValidator: Send + Sync {
    /// The policy this validator enforces.
    fn policy(&self) -> PolicyKind;

    /// Check message content against the guild's configuration.
    fn validate(&self, content: &str, config: &GuildConfig) -> ValidationOutcome;

    /// Build a violation tagged with this validator's policy.
    fn violation(&self, reason: impl Into<String>) -> ValidationOutcome
    where
        Self: Sized,
    {
        ValidationOutcome::Violation(Violation {
            policy: self.policy(),
            reason: reason.into(),
        })
    }
}
