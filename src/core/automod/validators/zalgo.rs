use super::ContentValidator;
use crate::core::automod::automod_models::{GuildConfig, PolicyKind, ValidationOutcome};

/// Flags "zalgo" text: characters buried under stacks of combining marks.
pub struct ZalgoValidator;

impl ContentValidator for ZalgoValidator {
    fn policy(&self) -> PolicyKind {
        PolicyKind::Zalgo
    }

    fn validate(&self, content: &str, config: &GuildConfig) -> ValidationOutcome {
        let limits = &config.auto_mod.limits;
        let (base, marks) = count_marks(content);

        if marks < limits.min_zalgo_marks.max(1) {
            return ValidationOutcome::Pass;
        }

        let density = marks as f32 / base.max(1) as f32;
        if density > limits.max_zalgo_ratio {
            return self.violation("Message contains zalgo text.");
        }

        ValidationOutcome::Pass
    }
}

/// Returns (base characters, combining marks). Whitespace is ignored.
fn count_marks(content: &str) -> (usize, usize) {
    content
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0, 0), |(base, marks), c| {
            if is_combining_mark(c) {
                (base, marks + 1)
            } else {
                (base + 1, marks)
            }
        })
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c as u32,
        0x0300..=0x036F
            | 0x0483..=0x0489
            | 0x1AB0..=0x1AFF
            | 0x1DC0..=0x1DFF
            | 0x20D0..=0x20FF
            | 0xFE20..=0xFE2F
    )
}
