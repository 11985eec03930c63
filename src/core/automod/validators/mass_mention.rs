use super::ContentValidator;
use crate::core::automod::automod_models::{GuildConfig, PolicyKind, ValidationOutcome};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// `<@id>` and `<@!id>` are users, `<@&id>` is a role.
static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@([!&]?)(\d+)>").expect("mention pattern is valid"));

/// Flags messages that ping too many distinct users or roles.
pub struct MassMentionValidator;

impl ContentValidator for MassMentionValidator {
    fn policy(&self) -> PolicyKind {
        PolicyKind::MassMention
    }

    fn validate(&self, content: &str, config: &GuildConfig) -> ValidationOutcome {
        let max = config.auto_mod.limits.max_mentions;
        let mentions = distinct_mentions(content);

        if mentions > max {
            return self.violation(format!(
                "Message contains too many mentions ({} > {}).",
                mentions, max
            ));
        }

        ValidationOutcome::Pass
    }
}

fn distinct_mentions(content: &str) -> usize {
    MENTION_PATTERN
        .captures_iter(content)
        .map(|caps| {
            let is_role = &caps[1] == "&";
            (is_role, caps[2].to_string())
        })
        .collect::<HashSet<_>>()
        .len()
}
