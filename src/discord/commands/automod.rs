// Auto-mod configuration commands.

use crate::discord::{Context, Error};
use guild_automod::core::automod::validators::LinkPattern;
use guild_automod::core::automod::PolicyKind;
use poise::serenity_prelude as serenity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ListAction {
    #[name = "Add"]
    Add,
    #[name = "Remove"]
    Remove,
}

/// Auto-moderation configuration commands.
///
/// Pick which filters run, in what order, and what happens on a violation.
#[poise::command(
    slash_command,
    subcommands("status", "filters", "autodelete", "autowarn", "banword", "banlink"),
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn automod(_ctx: Context<'_>) -> Result<(), Error> {
    // Parent command - shows help
    Ok(())
}

/// Show the current auto-mod settings.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let config = ctx.data().automod.get_config(guild_id.get()).await?;
    let auto_mod = &config.auto_mod;

    let filters = if auto_mod.filters.is_empty() {
        "None - auto-mod is off".to_string()
    } else {
        auto_mod
            .filters
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let marker = if ctx.data().automod.registry().lookup(kind).is_some() {
                    ""
                } else {
                    " *(unknown, skipped)*"
                };
                format!("{}. `{}`{}", i + 1, kind, marker)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let limits = &auto_mod.limits;
    let embed = serenity::CreateEmbed::new()
        .title("🛡️ Auto-Mod Status")
        .color(if auto_mod.filters.is_empty() {
            0xFF0000
        } else {
            0x00FF00
        })
        .field("Filters (in order)", filters, false)
        .field("Delete Messages", on_off(auto_mod.auto_delete_messages), true)
        .field("Warn Users", on_off(auto_mod.auto_warn_users), true)
        .field(
            "Lists",
            format!(
                "{} banned words\n{} banned links",
                auto_mod.ban_words.len(),
                auto_mod.ban_links.len()
            ),
            true,
        )
        .field(
            "Limits",
            format!(
                "Emojis: {} per message\nMentions: {} per message\nCaps: {:.0}% over {} letters\nZalgo: {:.0}% density",
                limits.max_emojis,
                limits.max_mentions,
                limits.max_caps_ratio * 100.0,
                limits.min_caps_length,
                limits.max_zalgo_ratio * 100.0
            ),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Set which filters run, in priority order. Leave empty to turn auto-mod off.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn filters(
    ctx: Context<'_>,
    #[description = "Comma-separated filters, e.g. BadWord, BadLink, MassCaps"] filters: Option<
        String,
    >,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let requested = parse_filter_list(filters.as_deref().unwrap_or_default());

    let config = ctx
        .data()
        .automod
        .update_config(guild_id.get(), |auto_mod| auto_mod.set_filters(requested))
        .await?;

    let filters = &config.auto_mod.filters;
    if filters.is_empty() {
        ctx.say("❌ Auto-mod filters cleared. Messages will no longer be checked.")
            .await?;
        return Ok(());
    }

    let order = filters
        .iter()
        .map(|kind| format!("`{}`", kind))
        .collect::<Vec<_>>()
        .join(" → ");
    let unknown: Vec<String> = filters
        .iter()
        .filter(|kind| ctx.data().automod.registry().lookup(kind).is_none())
        .map(|kind| format!("`{}`", kind))
        .collect();

    let mut reply = format!("✅ Auto-mod filters set: {}", order);
    if !unknown.is_empty() {
        reply.push_str(&format!(
            "\n⚠️ Not recognised, will be skipped: {}",
            unknown.join(", ")
        ));
    }

    ctx.say(reply).await?;
    Ok(())
}

/// Delete messages that break a filter.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn autodelete(
    ctx: Context<'_>,
    #[description = "Delete offending messages"] enabled: bool,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    ctx.data()
        .automod
        .update_config(guild_id.get(), |auto_mod| {
            auto_mod.auto_delete_messages = enabled
        })
        .await?;

    ctx.say(format!(
        "🗑️ Deleting offending messages is now **{}**.",
        if enabled { "enabled" } else { "disabled" }
    ))
    .await?;
    Ok(())
}

/// Warn members whose messages break a filter.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn autowarn(
    ctx: Context<'_>,
    #[description = "Warn offending members"] enabled: bool,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    ctx.data()
        .automod
        .update_config(guild_id.get(), |auto_mod| auto_mod.auto_warn_users = enabled)
        .await?;

    ctx.say(format!(
        "⚠️ Warning offending members is now **{}**.",
        if enabled { "enabled" } else { "disabled" }
    ))
    .await?;
    Ok(())
}

/// Add or remove a banned word or phrase.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn banword(
    ctx: Context<'_>,
    #[description = "Add or remove"] action: ListAction,
    #[description = "Word or phrase"] word: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    let mut changed = false;
    ctx.data()
        .automod
        .update_config(guild_id.get(), |auto_mod| {
            changed = edit_list(&mut auto_mod.ban_words, action, &word)
        })
        .await?;

    ctx.say(list_reply("word", action, &word, changed)).await?;
    Ok(())
}

/// Add or remove a banned link, domain or link prefix.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn banlink(
    ctx: Context<'_>,
    #[description = "Add or remove"] action: ListAction,
    #[description = "Domain or link, e.g. discord.gg or example.com/promo"] link: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    if action == ListAction::Add && LinkPattern::parse(&link).is_none() {
        ctx.send(
            poise::CreateReply::default()
                .content(format!(
                    "❌ `{}` isn't a domain or link, e.g. `example.com/promo`.",
                    link.trim()
                ))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let mut changed = false;
    ctx.data()
        .automod
        .update_config(guild_id.get(), |auto_mod| {
            changed = edit_list(&mut auto_mod.ban_links, action, &link)
        })
        .await?;

    ctx.say(list_reply("link", action, &link, changed)).await?;
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "✅ On"
    } else {
        "❌ Off"
    }
}

/// Parse a comma-separated filter list. Blank entries are dropped; duplicates
/// are removed when the list is saved.
fn parse_filter_list(raw: &str) -> Vec<PolicyKind> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(PolicyKind::parse)
        .collect()
}

/// Apply an add/remove to a ban list. Entries are stored lowercased.
/// Returns whether the list changed.
fn edit_list(list: &mut Vec<String>, action: ListAction, value: &str) -> bool {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return false;
    }

    match action {
        ListAction::Add => {
            if list.iter().any(|entry| entry.to_lowercase() == value) {
                return false;
            }
            list.push(value);
            true
        }
        ListAction::Remove => {
            let before = list.len();
            list.retain(|entry| entry.to_lowercase() != value);
            list.len() != before
        }
    }
}

fn list_reply(noun: &str, action: ListAction, value: &str, changed: bool) -> String {
    let value = value.trim();
    match (action, changed) {
        (ListAction::Add, true) => format!("✅ Banned {} `{}` added.", noun, value),
        (ListAction::Add, false) => format!("ℹ️ `{}` is already banned.", value),
        (ListAction::Remove, true) => format!("✅ Banned {} `{}` removed.", noun, value),
        (ListAction::Remove, false) => format!("ℹ️ `{}` wasn't on the list.", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_list_keeps_order_and_unknowns() {
        let kinds = parse_filter_list("mass caps, BadWord,, LinkSpam2 ");
        assert_eq!(
            kinds,
            vec![
                PolicyKind::MassCaps,
                PolicyKind::BadWord,
                PolicyKind::Unknown("LinkSpam2".to_string()),
            ]
        );
        assert!(parse_filter_list("  ").is_empty());
    }

    #[test]
    fn test_edit_list_add_is_case_insensitive() {
        let mut list = vec!["idiot".to_string()];
        assert!(!edit_list(&mut list, ListAction::Add, "IDIOT"));
        assert!(edit_list(&mut list, ListAction::Add, "  Scam Bot "));
        assert_eq!(list, vec!["idiot".to_string(), "scam bot".to_string()]);
    }

    #[test]
    fn test_edit_list_remove() {
        let mut list = vec!["idiot".to_string(), "discord.gg".to_string()];
        assert!(edit_list(&mut list, ListAction::Remove, "Discord.GG"));
        assert!(!edit_list(&mut list, ListAction::Remove, "discord.gg"));
        assert!(!edit_list(&mut list, ListAction::Remove, "   "));
        assert_eq!(list, vec!["idiot".to_string()]);
    }
}
