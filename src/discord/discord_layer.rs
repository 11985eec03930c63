// Discord layer - commands, event handling and the platform adapter.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "automod/message_handler.rs"]
pub mod message_handler;

#[path = "automod/serenity_platform.rs"]
pub mod platform;

#[path = "automod/punishment_listener.rs"]
pub mod punishment_listener;

use guild_automod::core::automod::AutoModService;
use guild_automod::infra::automod::AutoModStore;
use platform::SerenityPlatform;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub type AutoMod = AutoModService<AutoModStore, AutoModStore, SerenityPlatform>;

/// Data that's shared across all commands and event handlers.
pub struct Data {
    pub automod: Arc<AutoMod>,
}
