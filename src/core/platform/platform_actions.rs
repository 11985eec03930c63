use super::platform_models::{Message, UserRef};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Missing permissions")]
    PermissionDenied,

    #[error("Target not found")]
    NotFound,

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Side effects the moderation core asks the chat platform to perform.
#[async_trait]
pub trait PlatformActions: Send + Sync {
    /// The bot's own identity, used as the instigator of automatic warnings.
    fn current_user(&self) -> Option<UserRef>;

    /// Delete a message, recording `reason` in the audit log.
    async fn delete_message(&self, message: &Message, reason: &str) -> Result<(), PlatformError>;

    /// Send a direct message to a user.
    async fn send_direct_message(&self, user: &UserRef, text: &str) -> Result<(), PlatformError>;
}
