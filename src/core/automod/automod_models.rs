// Auto-moderation domain models - policies, guild configuration and outcomes.
//
// These are pure domain types with no Discord dependencies.
// Guild configuration is persisted as camelCase JSON.

use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Identifier for one configurable content policy.
///
/// Names that don't match a known policy are kept as `Unknown` so that
/// configuration written by older or newer versions still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyKind {
    BadWord,
    BadLink,
    Emoji,
    MassMention,
    MassCaps,
    Zalgo,
    Unknown(String),
}

impl PolicyKind {
    /// Every policy with a built-in validator, in default priority order.
    pub const ALL: [PolicyKind; 6] = [
        PolicyKind::BadWord,
        PolicyKind::BadLink,
        PolicyKind::Emoji,
        PolicyKind::MassMention,
        PolicyKind::MassCaps,
        PolicyKind::Zalgo,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PolicyKind::BadWord => "BadWord",
            PolicyKind::BadLink => "BadLink",
            PolicyKind::Emoji => "Emoji",
            PolicyKind::MassMention => "MassMention",
            PolicyKind::MassCaps => "MassCaps",
            PolicyKind::Zalgo => "Zalgo",
            PolicyKind::Unknown(name) => name,
        }
    }

    /// Parse a policy name. Case, spaces, `_` and `-` are ignored.
    pub fn parse(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "badword" | "badwords" => PolicyKind::BadWord,
            "badlink" | "badlinks" => PolicyKind::BadLink,
            "emoji" | "emojis" => PolicyKind::Emoji,
            "massmention" | "massmentions" => PolicyKind::MassMention,
            "masscaps" => PolicyKind::MassCaps,
            "zalgo" => PolicyKind::Zalgo,
            _ => PolicyKind::Unknown(name.trim().to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PolicyKind::Unknown(_))
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PolicyKind::parse(s))
    }
}

impl From<String> for PolicyKind {
    fn from(name: String) -> Self {
        PolicyKind::parse(&name)
    }
}

impl From<PolicyKind> for String {
    fn from(kind: PolicyKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Thresholds used by the heuristic validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoModLimits {
    /// More emoji than this is always a violation
    pub max_emojis: usize,
    /// Share of glyphs that may be emoji
    pub max_emoji_ratio: f32,
    /// Minimum emoji count before the ratio check applies
    pub min_emoji_ratio_count: usize,
    /// Distinct user/role mentions allowed in one message
    pub max_mentions: usize,
    /// Share of letters that may sit in uppercase runs
    pub max_caps_ratio: f32,
    /// Minimum letter count before the caps check applies
    pub min_caps_length: usize,
    /// Combining marks allowed per base character
    pub max_zalgo_ratio: f32,
    /// Minimum combining marks before the zalgo check applies
    pub min_zalgo_marks: usize,
}

impl Default for AutoModLimits {
    fn default() -> Self {
        Self {
            max_emojis: 8,
            max_emoji_ratio: 0.7,
            min_emoji_ratio_count: 4,
            max_mentions: 5,
            max_caps_ratio: 0.7,
            min_caps_length: 10,
            max_zalgo_ratio: 0.5,
            min_zalgo_marks: 3,
        }
    }
}

/// Per-guild auto-moderation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoModConfig {
    /// Active policies. Order is both enablement and priority.
    #[serde(deserialize_with = "deserialize_filters")]
    pub filters: Vec<PolicyKind>,
    pub auto_delete_messages: bool,
    pub auto_warn_users: bool,
    pub ban_words: Vec<String>,
    pub ban_links: Vec<String>,
    pub limits: AutoModLimits,
}

impl Default for AutoModConfig {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            auto_delete_messages: true,
            auto_warn_users: false,
            ban_words: Vec::new(),
            ban_links: Vec::new(),
            limits: AutoModLimits::default(),
        }
    }
}

impl AutoModConfig {
    /// Replace the active filters, dropping repeated kinds (first occurrence wins).
    pub fn set_filters(&mut self, filters: impl IntoIterator<Item = PolicyKind>) {
        self.filters = dedup_filters(filters);
    }
}

/// Guild configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    pub guild_id: u64,
    #[serde(default)]
    pub auto_mod: AutoModConfig,
}

impl GuildConfig {
    /// Default configuration for a guild that has never saved one.
    pub fn new(guild_id: u64) -> Self {
        Self {
            guild_id,
            auto_mod: AutoModConfig::default(),
        }
    }
}

fn dedup_filters(filters: impl IntoIterator<Item = PolicyKind>) -> Vec<PolicyKind> {
    let mut unique: Vec<PolicyKind> = Vec::new();
    for kind in filters {
        if !unique.contains(&kind) {
            unique.push(kind);
        }
    }
    unique
}

fn deserialize_filters<'de, D>(deserializer: D) -> Result<Vec<PolicyKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<PolicyKind>::deserialize(deserializer)?;
    Ok(dedup_filters(raw))
}

/// A policy breach found by a validator. This is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub policy: PolicyKind,
    /// Human-readable reason, used for audit logs, warnings and DMs
    pub reason: String,
}

/// Result of running one validator over a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    Violation(Violation),
}

impl ValidationOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationOutcome::Pass)
    }
}

/// Enforcement actions that were carried out for a violation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enforcement {
    /// The message was deleted
    pub deleted: bool,
    /// The author was warned; holds their new warning count
    pub warnings: Option<usize>,
}

/// Result of evaluating a message against a guild's active policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// No active policy was violated
    Pass,
    /// The first violated policy in configured order, with enforcement already applied
    Violation {
        violation: Violation,
        enforcement: Enforcement,
    },
}

impl ModerationOutcome {
    pub fn is_violation(&self) -> bool {
        matches!(self, ModerationOutcome::Violation { .. })
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            ModerationOutcome::Violation { violation, .. } => Some(violation),
            ModerationOutcome::Pass => None,
        }
    }
}
