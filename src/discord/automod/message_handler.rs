// Feeds incoming guild messages into the auto-mod pipeline.

use super::platform::user_ref;
use crate::discord::{Data, Error};
use guild_automod::core::automod::ModerationOutcome;
use guild_automod::core::platform::{MemberRef, Message};
use poise::serenity_prelude as serenity;

/// Check a message against the guild's auto-mod policies.
///
/// Enforcement happens inside the core; this only translates and logs.
pub async fn handle_message_for_automod(data: &Data, msg: &serenity::Message) -> Result<(), Error> {
    // Skip bots and webhooks
    if msg.author.bot || msg.webhook_id.is_some() {
        return Ok(());
    }

    // Only check guild messages
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let message = to_core_message(guild_id.get(), msg);

    match data.automod.check_message(&message).await? {
        ModerationOutcome::Pass => {}
        ModerationOutcome::Violation {
            violation,
            enforcement,
        } => {
            tracing::debug!(
                guild_id = message.guild_id,
                message_id = message.id,
                policy = %violation.policy,
                deleted = enforcement.deleted,
                warnings = ?enforcement.warnings,
                "Auto-mod enforcement finished"
            );
        }
    }

    Ok(())
}

fn to_core_message(guild_id: u64, msg: &serenity::Message) -> Message {
    let author = user_ref(&msg.author);
    // Gateway message events carry partial member data for guild messages
    let member = msg
        .member
        .as_ref()
        .map(|_| MemberRef::new(guild_id, author.clone()));

    Message {
        id: msg.id.get(),
        guild_id,
        channel_id: msg.channel_id.get(),
        content: msg.content.clone(),
        author,
        member,
    }
}
