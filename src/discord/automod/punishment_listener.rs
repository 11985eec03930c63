// Background subscriber that records moderation events in the bot log.

use guild_automod::core::events::{ModerationEvent, ModerationEventBus};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Spawn a task that logs every event published on the bus.
/// It exits once every publisher handle has been dropped.
pub fn spawn(events: &ModerationEventBus) -> JoinHandle<()> {
    let mut rx = events.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Punishment listener fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("Punishment listener stopped");
    })
}

fn log_event(event: &ModerationEvent) {
    match event {
        ModerationEvent::UserWarn(punishment) => {
            tracing::info!(
                event = event.name(),
                guild_id = punishment.guild_id,
                user_id = punishment.user.id,
                instigator_id = punishment.instigator.id,
                warnings = punishment.warnings,
                reason = %punishment.reason,
                "{} was warned",
                punishment.user.name
            );
        }
    }
}
