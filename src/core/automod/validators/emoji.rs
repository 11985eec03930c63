use super::ContentValidator;
use crate::core::automod::automod_models::{GuildConfig, PolicyKind, ValidationOutcome};
use regex::Regex;
use std::sync::LazyLock;

// Guild emoji, e.g. `<:pepe:123>` or `<a:dance:456>`.
static CUSTOM_EMOJI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<a?:[A-Za-z0-9_~]+:\d+>").expect("custom emoji pattern is valid")
});

const ZERO_WIDTH_JOINER: char = '\u{200D}';

/// Flags messages made up mostly of emoji, or with too many of them.
pub struct EmojiValidator;

impl ContentValidator for EmojiValidator {
    fn policy(&self) -> PolicyKind {
        PolicyKind::Emoji
    }

    fn validate(&self, content: &str, config: &GuildConfig) -> ValidationOutcome {
        let limits = &config.auto_mod.limits;
        let counts = count_emoji(content);

        if counts.emoji == 0 {
            return ValidationOutcome::Pass;
        }

        if counts.emoji > limits.max_emojis {
            return self.violation(format!(
                "Message contains too many emojis ({} > {}).",
                counts.emoji, limits.max_emojis
            ));
        }

        let ratio = counts.emoji as f32 / counts.glyphs.max(1) as f32;
        if counts.emoji >= limits.min_emoji_ratio_count && ratio > limits.max_emoji_ratio {
            return self.violation("Message is mostly emojis.");
        }

        ValidationOutcome::Pass
    }
}

#[derive(Debug, Default, PartialEq)]
struct EmojiCounts {
    /// Emoji as a reader would count them
    emoji: usize,
    /// Visible glyphs, with each emoji counted once
    glyphs: usize,
}

fn count_emoji(content: &str) -> EmojiCounts {
    let mut counts = EmojiCounts::default();

    let custom = CUSTOM_EMOJI_PATTERN.find_iter(content).count();
    counts.emoji += custom;
    counts.glyphs += custom;

    let remaining = CUSTOM_EMOJI_PATTERN.replace_all(content, " ");
    let mut previous: Option<char> = None;
    let mut pending_flag_half = false;

    for c in remaining.chars() {
        if c.is_whitespace() {
            pending_flag_half = false;
        } else if is_emoji_modifier(c) {
            // Part of the previous glyph
        } else if is_regional_indicator(c) {
            // Two regional indicators make one flag
            if pending_flag_half {
                pending_flag_half = false;
            } else {
                pending_flag_half = true;
                counts.emoji += 1;
                counts.glyphs += 1;
            }
        } else if is_pictograph(c) {
            pending_flag_half = false;
            // Joined sequences (families, professions) render as one emoji
            if previous != Some(ZERO_WIDTH_JOINER) {
                counts.emoji += 1;
                counts.glyphs += 1;
            }
        } else {
            pending_flag_half = false;
            counts.glyphs += 1;
        }
        previous = Some(c);
    }

    counts
}

fn is_pictograph(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1F1E5
            | 0x1F200..=0x1F3FA
            | 0x1F400..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x2934..=0x2935
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
    )
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

/// Characters that decorate an emoji rather than being one.
fn is_emoji_modifier(c: char) -> bool {
    matches!(
        c as u32,
        0x200D | 0xFE0E | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF | 0xE0020..=0xE007F
    )
}
