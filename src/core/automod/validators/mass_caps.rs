use super::ContentValidator;
use crate::core::automod::automod_models::{GuildConfig, PolicyKind, ValidationOutcome};

/// Flags shouting: long messages where most letters sit in runs of capitals.
///
/// Single capitals (sentence starts, "I") don't count towards the ratio, only
/// runs of two or more consecutive uppercase letters do.
pub struct MassCapsValidator;

impl ContentValidator for MassCapsValidator {
    fn policy(&self) -> PolicyKind {
        PolicyKind::MassCaps
    }

    fn validate(&self, content: &str, config: &GuildConfig) -> ValidationOutcome {
        let limits = &config.auto_mod.limits;
        let (letters, shouted) = count_caps(content);

        if letters < limits.min_caps_length.max(1) {
            return ValidationOutcome::Pass;
        }

        let ratio = shouted as f32 / letters as f32;
        if ratio > limits.max_caps_ratio {
            return self.violation(format!(
                "Message contains too many capital letters ({:.0}%).",
                ratio * 100.0
            ));
        }

        ValidationOutcome::Pass
    }
}

/// Returns (cased letters, letters in uppercase runs of length >= 2).
fn count_caps(content: &str) -> (usize, usize) {
    let mut letters = 0;
    let mut shouted = 0;
    let mut run = 0;

    for c in content.chars() {
        if c.is_uppercase() {
            letters += 1;
            run += 1;
            continue;
        }

        if run >= 2 {
            shouted += run;
        }
        run = 0;

        if c.is_lowercase() {
            letters += 1;
        }
    }

    if run >= 2 {
        shouted += run;
    }

    (letters, shouted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_only_runs() {
        assert_eq!(count_caps("I Am Here"), (7, 0));
        assert_eq!(count_caps("STOP it"), (6, 4));
        assert_eq!(count_caps("123 !!"), (0, 0));
    }

    #[test]
    fn test_short_messages_pass() {
        // 8 letters, below the default minimum of 10
        assert!(MassCapsValidator
            .validate("YOU IDIOT", &GuildConfig::new(1))
            .is_pass());
    }

    #[test]
    fn test_shouting_is_flagged() {
        match MassCapsValidator.validate("WHY IS NOBODY ANSWERING ME", &GuildConfig::new(1)) {
            ValidationOutcome::Violation(violation) => {
                assert_eq!(violation.policy, PolicyKind::MassCaps);
            }
            ValidationOutcome::Pass => panic!("expected a violation"),
        }
    }

    #[test]
    fn test_normal_sentence_with_acronym_passes() {
        assert!(MassCapsValidator
            .validate("The API docs for NASA are on the website", &GuildConfig::new(1))
            .is_pass());
    }

    #[test]
    fn test_ratio_at_limit_passes() {
        let mut config = GuildConfig::new(1);
        config.auto_mod.limits.max_caps_ratio = 0.5;

        // 5 of 10 letters shouted
        assert!(MassCapsValidator.validate("ABCDEfghij", &config).is_pass());
        // 6 of 10
        assert!(!MassCapsValidator.validate("ABCDEFghij", &config).is_pass());
    }
}
