// Moderation event bus.
//
// A cloneable handle over a tokio broadcast channel. The host creates it,
// hands clones to the services that publish, and decides who subscribes.
// Publishing never waits for subscribers.

use crate::core::warnings::PunishmentEvent;
use serde::Serialize;
use tokio::sync::broadcast;

/// Default number of events buffered per subscriber before it starts lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Events published by the moderation core.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "args", rename_all = "camelCase")]
pub enum ModerationEvent {
    /// A warning was persisted for a member
    UserWarn(PunishmentEvent),
}

impl ModerationEvent {
    /// Stable event name, as used by external subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            ModerationEvent::UserWarn(_) => "userWarn",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModerationEventBus {
    sender: broadcast::Sender<ModerationEvent>,
}

impl ModerationEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns how many subscribers will see it. Having none is fine.
    pub fn publish(&self, event: ModerationEvent) -> usize {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(event = name, receivers, "Published moderation event");
                receivers
            }
            Err(_) => {
                tracing::debug!(event = name, "No subscribers for moderation event");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModerationEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ModerationEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::UserRef;

    fn sample_event(warnings: usize) -> ModerationEvent {
        ModerationEvent::UserWarn(PunishmentEvent {
            guild_id: 1,
            instigator: UserRef::bot(99, "automod"),
            user: UserRef::new(5, "spammer"),
            reason: "Message contains zalgo text.".to_string(),
            warnings,
        })
    }

    #[tokio::test]
    async fn test_publishes_to_every_subscriber() {
        let bus = ModerationEventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(sample_event(1)), 2);

        for rx in [&mut first, &mut second] {
            let ModerationEvent::UserWarn(event) = rx.recv().await.unwrap();
            assert_eq!(event.warnings, 1);
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let bus = ModerationEventBus::new(4);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(sample_event(3)), 0);
    }

    #[test]
    fn test_event_serializes_with_its_name() {
        let event = sample_event(2);
        assert_eq!(event.name(), "userWarn");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "userWarn");
        assert_eq!(json["args"]["warnings"], 2);
    }
}
