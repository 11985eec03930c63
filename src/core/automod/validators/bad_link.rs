use super::ContentValidator;
use crate::core::automod::automod_models::{GuildConfig, PolicyKind, ValidationOutcome};
use regex::Regex;
use std::sync::LazyLock;

// Links with or without a scheme: host in group 1, port in group 2, path in group 3.
// Hosts are domain names or IPv4 addresses.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:https?://)?",
        r"((?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}|\d{1,3}(?:\.\d{1,3}){3})",
        r"(?::(\d{1,5}))?(/[^\s<>]*)?",
    ))
    .expect("link pattern is valid")
});

// A bare host, as accepted in a ban entry.
static HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}|\d{1,3}(?:\.\d{1,3}){3})$")
        .expect("host pattern is valid")
});

/// Flags messages linking to the guild's banned domains or URLs.
///
/// An entry without a path (`example.com`) bans the domain and all of its
/// subdomains. An entry with a path (`discord.gg/invite`) bans links on that
/// domain whose path starts with it, segment by segment. An entry with a port
/// only matches links on that port.
pub struct BadLinkValidator;

impl ContentValidator for BadLinkValidator {
    fn policy(&self) -> PolicyKind {
        PolicyKind::BadLink
    }

    fn validate(&self, content: &str, config: &GuildConfig) -> ValidationOutcome {
        if config.auto_mod.ban_links.is_empty() {
            return ValidationOutcome::Pass;
        }

        let links: Vec<Link> = LINK_PATTERN
            .captures_iter(content)
            .filter_map(|caps| {
                Some(Link {
                    host: caps.get(1)?.as_str().to_lowercase(),
                    port: caps.get(2).and_then(|m| m.as_str().parse().ok()),
                    path: caps
                        .get(3)
                        .map(|m| m.as_str().to_lowercase())
                        .unwrap_or_default(),
                })
            })
            .collect();

        if links.is_empty() {
            return ValidationOutcome::Pass;
        }

        for entry in &config.auto_mod.ban_links {
            // Entries that aren't links can never match anything
            let Some(pattern) = LinkPattern::parse(entry) else {
                continue;
            };

            if links.iter().any(|link| pattern.matches(link)) {
                return self.violation(format!(
                    "Message contains a banned link (`{}`).",
                    pattern
                ));
            }
        }

        ValidationOutcome::Pass
    }
}

struct Link {
    host: String,
    port: Option<u16>,
    path: String,
}

/// A parsed ban-list entry: `host[:port][/path]`, lowercased, without scheme,
/// leading `www.` or trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPattern {
    host: String,
    port: Option<u16>,
    path: String,
}

impl LinkPattern {
    /// Parse a ban-list entry. Returns `None` if it isn't a host or link.
    pub fn parse(entry: &str) -> Option<Self> {
        let lower = entry.trim().to_lowercase();
        let without_scheme = lower
            .strip_prefix("https://")
            .or_else(|| lower.strip_prefix("http://"))
            .unwrap_or(&lower);
        let without_www = without_scheme
            .strip_prefix("www.")
            .unwrap_or(without_scheme);
        let normalized = without_www.trim_end_matches('/');

        let (authority, path) = match normalized.find('/') {
            Some(i) => normalized.split_at(i),
            None => (normalized, ""),
        };
        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (host, Some(port.parse::<u16>().ok()?)),
            None => (authority, None),
        };

        if !HOST_PATTERN.is_match(host) {
            return None;
        }

        Some(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    fn matches(&self, link: &Link) -> bool {
        let host_matches = link.host == self.host
            || link
                .host
                .strip_suffix(self.host.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'));
        if !host_matches {
            return false;
        }

        if self.port.is_some() && link.port != self.port {
            return false;
        }

        if self.path.is_empty() {
            return true;
        }

        match link.path.strip_prefix(self.path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
            None => false,
        }
    }
}

impl std::fmt::Display for LinkPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(links: &[&str]) -> GuildConfig {
        let mut config = GuildConfig::new(1);
        config.auto_mod.ban_links = links.iter().map(|l| l.to_string()).collect();
        config
    }

    #[test]
    fn test_bans_domain_and_subdomains() {
        let config = config(&["https://www.scam.io/"]);

        assert!(!BadLinkValidator
            .validate("free nitro at https://scam.io/claim", &config)
            .is_pass());
        assert!(!BadLinkValidator
            .validate("try gifts.SCAM.io today", &config)
            .is_pass());
        assert!(BadLinkValidator
            .validate("see https://notscam.io", &config)
            .is_pass());
    }

    #[test]
    fn test_bans_path_patterns() {
        // Trailing slash is stripped, so this bans the whole domain
        let invites = config(&["discord.gg/"]);
        assert!(!BadLinkValidator
            .validate("join discord.gg/abc", &invites)
            .is_pass());

        let shorts = config(&["youtube.com/shorts"]);
        assert!(!BadLinkValidator
            .validate("<https://youtube.com/shorts/xyz>", &shorts)
            .is_pass());
        assert!(BadLinkValidator
            .validate("https://youtube.com/watch?v=1", &shorts)
            .is_pass());
        assert!(BadLinkValidator
            .validate("https://youtube.com/shortsale", &shorts)
            .is_pass());
    }

    #[test]
    fn test_path_entry_does_not_match_other_domains() {
        let claim = config(&["scam.io/claim"]);
        assert!(BadLinkValidator
            .validate("legit https://notscam.io/claim", &claim)
            .is_pass());
        assert!(!BadLinkValidator
            .validate("https://gifts.scam.io/claim?id=1", &claim)
            .is_pass());
        assert!(BadLinkValidator
            .validate("https://scam.io/about", &claim)
            .is_pass());
    }

    #[test]
    fn test_ip_and_port_entries() {
        let ip = config(&["1.2.3.4"]);
        assert!(!BadLinkValidator
            .validate("grab it at http://1.2.3.4:8000/file", &ip)
            .is_pass());
        assert!(BadLinkValidator.validate("http://11.2.3.4", &ip).is_pass());

        let port = config(&["evil.com:8080"]);
        assert!(!BadLinkValidator
            .validate("http://evil.com:8080/login", &port)
            .is_pass());
        assert!(BadLinkValidator.validate("http://evil.com/login", &port).is_pass());
    }

    #[test]
    fn test_parse_rejects_entries_that_are_not_links() {
        assert!(LinkPattern::parse("hello").is_none());
        assert!(LinkPattern::parse("evil.com:http").is_none());
        assert!(LinkPattern::parse("  ").is_none());

        let pattern = LinkPattern::parse("HTTPS://www.Evil.com:8080/Promo/").unwrap();
        assert_eq!(pattern.to_string(), "evil.com:8080/promo");
    }

    #[test]
    fn test_violation_is_tagged_with_bad_link() {
        let result = BadLinkValidator.validate("http://evil.com", &config(&["evil.com"]));
        match result {
            ValidationOutcome::Violation(violation) => {
                assert_eq!(violation.policy, PolicyKind::BadLink);
                assert!(violation.reason.contains("evil.com"));
            }
            ValidationOutcome::Pass => panic!("expected a violation"),
        }
    }

    #[test]
    fn test_plain_text_passes() {
        let config = config(&["evil.com"]);
        assert!(BadLinkValidator.validate("nothing to see here.", &config).is_pass());
    }
}
