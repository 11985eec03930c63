// Manual warning commands for moderators.

use crate::discord::platform::user_ref;
use crate::discord::{Context, Error};
use guild_automod::core::platform::MemberRef;
use guild_automod::core::warnings::Warning;
use poise::serenity_prelude as serenity;

/// Most recent warnings shown by `/warnings`.
const WARNINGS_SHOWN: usize = 10;

/// Warn a member. They'll get a DM if they accept them.
#[poise::command(slash_command, guild_only, required_permissions = "MODERATE_MEMBERS")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "Member to warn"] user: serenity::User,
    #[description = "Why they're being warned"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    let member = MemberRef::new(guild_id.get(), user_ref(&user));
    let instigator = user_ref(ctx.author());

    match ctx
        .data()
        .automod
        .warnings()
        .warn(&member, &instigator, reason.as_deref())
        .await
    {
        Ok(count) => {
            ctx.say(format!(
                "⚠️ <@{}> has been warned. They now have **{}** {}.",
                user.id,
                count,
                plural(count, "warning")
            ))
            .await?;
        }
        Err(e) if e.is_invalid_operation() => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("❌ {}", e))
                    .ephemeral(true),
            )
            .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// List a member's warnings, newest first.
#[poise::command(slash_command, guild_only, required_permissions = "MODERATE_MEMBERS")]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "Member to look up"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    if user.bot {
        ctx.say("🤖 Bots don't have warnings.").await?;
        return Ok(());
    }

    let member = MemberRef::new(guild_id.get(), user_ref(&user));
    let warnings = ctx.data().automod.warnings().warnings(&member).await?;

    if warnings.is_empty() {
        ctx.say(format!("✅ <@{}> has no warnings.", user.id)).await?;
        return Ok(());
    }

    let embed = serenity::CreateEmbed::new()
        .title(format!("⚠️ Warnings for {}", user.name))
        .description(format_warnings(&warnings))
        .color(0xFFA500)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} {} total",
            warnings.len(),
            plural(warnings.len(), "warning")
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn format_warnings(warnings: &[Warning]) -> String {
    warnings
        .iter()
        .enumerate()
        .rev()
        .take(WARNINGS_SHOWN)
        .map(|(i, warning)| {
            format!(
                "**#{}** <t:{}:R> by <@{}>\n{}",
                i + 1,
                warning.at.timestamp(),
                warning.instigator_id,
                warning.reason
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}
