// This is the entry point of the auto-mod bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic), exported by the library
// - `infra/` = Implementations of core traits (SQLite, in-memory)
// - `discord/` = Discord-specific adapters (commands, events, platform actions)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

#[path = "discord/discord_layer.rs"]
mod discord;
mod settings;

use crate::discord::message_handler::handle_message_for_automod;
use crate::discord::platform::SerenityPlatform;
use crate::discord::{punishment_listener, Data, Error};
use crate::settings::{Settings, StorageBackend};
use anyhow::Context as _;
use guild_automod::core::automod::{AutoModService, ValidatorRegistry};
use guild_automod::core::events::ModerationEventBus;
use guild_automod::core::warnings::WarningService;
use guild_automod::infra::automod::AutoModStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        // A failed check must never take the handler down with it
        if let Err(e) = handle_message_for_automod(data, new_message).await {
            tracing::error!(
                message_id = new_message.id.get(),
                "Error running auto-mod on message: {}",
                e
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let settings = Settings::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let store = match settings.storage {
        StorageBackend::Sqlite => {
            std::fs::create_dir_all(&settings.data_dir).with_context(|| {
                format!(
                    "Failed to create data directory {}",
                    settings.data_dir.display()
                )
            })?;
            let database_path = settings.database_path();
            AutoModStore::sqlite(&database_path.to_string_lossy())
                .await
                .context("Failed to initialize SQLite store")?
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, configs and warnings won't survive a restart");
            AutoModStore::memory()
        }
    };
    tracing::info!(backend = store.backend_name(), "Storage ready");
    let store = Arc::new(store);

    let events = ModerationEventBus::new(settings.event_capacity);
    punishment_listener::spawn(&events);

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::automod::automod(),
                discord::commands::warnings::warn(),
                discord::commands::warnings::warnings(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("🤖 Bot is starting up as {}", ready.user.name);

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("✅ Commands registered!");

                // The platform needs the bot's own identity, which we only know once connected
                let platform = Arc::new(SerenityPlatform::new(ctx.http.clone(), &ready.user));
                let warnings = Arc::new(WarningService::new(
                    Arc::clone(&store),
                    Arc::clone(&platform),
                    events,
                ));
                let automod = AutoModService::new(
                    Arc::new(ValidatorRegistry::standard()),
                    Arc::clone(&store),
                    warnings,
                    platform,
                );

                tracing::info!(
                    policies = automod.registry().len(),
                    "🚀 Auto-mod is ready!"
                );

                Ok(Data {
                    automod: Arc::new(automod),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&settings.token, intents)
        .framework(framework)
        .await
        .context("Failed to create Discord client")?;

    client.start().await.context("Discord client stopped")?;
    Ok(())
}
