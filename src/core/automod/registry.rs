// Validator registry - built once at startup, read-only afterwards.

use super::automod_models::PolicyKind;
use super::validators::{
    BadLinkValidator, BadWordValidator, ContentValidator, EmojiValidator, MassCapsValidator,
    MassMentionValidator, ZalgoValidator,
};

/// Order-preserving set of validators, at most one per policy.
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn ContentValidator>>,
}

impl ValidatorRegistry {
    /// Build a registry from the given validators.
    ///
    /// If two validators claim the same policy, the first one is kept.
    pub fn new(validators: Vec<Box<dyn ContentValidator>>) -> Self {
        let mut unique: Vec<Box<dyn ContentValidator>> = Vec::with_capacity(validators.len());
        for validator in validators {
            let policy = validator.policy();
            if unique.iter().any(|v| v.policy() == policy) {
                tracing::warn!(%policy, "Ignoring duplicate validator registration");
                continue;
            }
            unique.push(validator);
        }
        Self { validators: unique }
    }

    /// The built-in validators, one for every known policy.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(BadWordValidator),
            Box::new(BadLinkValidator),
            Box::new(EmojiValidator),
            Box::new(MassMentionValidator),
            Box::new(MassCapsValidator),
            Box::new(ZalgoValidator),
        ])
    }

    pub fn lookup(&self, policy: &PolicyKind) -> Option<&dyn ContentValidator> {
        self.validators
            .iter()
            .find(|v| &v.policy() == policy)
            .map(|v| v.as_ref())
    }

    /// Registered policies in registration order.
    pub fn policies(&self) -> Vec<PolicyKind> {
        self.validators.iter().map(|v| v.policy()).collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
