// Errors shared by every storage port in the core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bots don't have member records (user {0})")]
    BotAccount(u64),

    #[error("Warnings are append-only; refusing to drop entries for user {0}")]
    WarningsShrunk(u64),
}
