use super::ContentValidator;
use crate::core::automod::automod_models::{GuildConfig, PolicyKind, ValidationOutcome};

/// Flags messages containing any of the guild's banned words or phrases.
///
/// Matching is case-insensitive and only on whole words, so "ass" does not
/// match "class". Multi-word entries must appear as consecutive words.
pub struct BadWordValidator;

impl ContentValidator for BadWordValidator {
    fn policy(&self) -> PolicyKind {
        PolicyKind::BadWord
    }

    fn validate(&self, content: &str, config: &GuildConfig) -> ValidationOutcome {
        let words = tokenize(content);
        if words.is_empty() {
            return ValidationOutcome::Pass;
        }

        for entry in &config.auto_mod.ban_words {
            let phrase = tokenize(entry);
            if phrase.is_empty() || phrase.len() > words.len() {
                continue;
            }

            if words.windows(phrase.len()).any(|window| window == phrase.as_slice()) {
                return self.violation(format!(
                    "Message contains the banned word `{}`.",
                    entry.trim()
                ));
            }
        }

        ValidationOutcome::Pass
    }
}

/// Split text into lowercase alphanumeric words.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
