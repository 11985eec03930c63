// Process configuration, read from the environment (and `.env` via dotenv).

use anyhow::Context as _;
use guild_automod::core::events::DEFAULT_EVENT_CAPACITY;
use std::path::PathBuf;

/// Where guild configs and warnings are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// `automod.db` in the data directory
    Sqlite,
    /// Nothing survives a restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub storage: StorageBackend,
    /// Folder for runtime databases so the repo root stays tidy
    pub data_dir: PathBuf,
    /// Events buffered per event-bus subscriber
    pub event_capacity: usize,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .context(
                "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
            )?;

        let storage = match lookup("AUTOMOD_STORAGE")
            .map(|raw| raw.trim().to_lowercase())
            .as_deref()
        {
            None | Some("") | Some("sqlite") => StorageBackend::Sqlite,
            Some("memory") => StorageBackend::Memory,
            Some(other) => anyhow::bail!(
                "AUTOMOD_STORAGE must be `sqlite` or `memory`, got {:?}",
                other
            ),
        };

        let data_dir = lookup("AUTOMOD_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| "data".to_string())
            .into();

        let event_capacity = match lookup("AUTOMOD_EVENT_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .with_context(|| {
                    format!("AUTOMOD_EVENT_CAPACITY must be a positive number, got {raw:?}")
                })?,
            None => DEFAULT_EVENT_CAPACITY,
        };

        Ok(Self {
            token,
            storage,
            data_dir,
            event_capacity,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("automod.db")
    }
}
