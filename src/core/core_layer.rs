// The core module contains all moderation logic.
// Each concern gets its own submodule.

#[path = "automod/mod.rs"]
pub mod automod;

#[path = "warnings/mod.rs"]
pub mod warnings;

#[path = "events/event_bus.rs"]
pub mod events;

#[path = "platform/mod.rs"]
pub mod platform;

#[path = "storage.rs"]
pub mod storage;

#[cfg(test)]
#[path = "test_support.rs"]
pub mod test_support;
