// Serenity implementation of the core's platform actions.

use async_trait::async_trait;
use guild_automod::core::platform::{Message, PlatformActions, PlatformError, UserRef};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub struct SerenityPlatform {
    http: Arc<serenity::Http>,
    current_user: UserRef,
}

impl SerenityPlatform {
    pub fn new(http: Arc<serenity::Http>, current_user: &serenity::User) -> Self {
        Self {
            http,
            current_user: user_ref(current_user),
        }
    }
}

/// Convert a Discord user into the core's user type.
pub fn user_ref(user: &serenity::User) -> UserRef {
    UserRef {
        id: user.id.get(),
        name: user.name.clone(),
        bot: user.bot,
    }
}

#[async_trait]
impl PlatformActions for SerenityPlatform {
    fn current_user(&self) -> Option<UserRef> {
        Some(self.current_user.clone())
    }

    async fn delete_message(&self, message: &Message, reason: &str) -> Result<(), PlatformError> {
        self.http
            .delete_message(
                serenity::ChannelId::new(message.channel_id),
                serenity::MessageId::new(message.id),
                Some(reason),
            )
            .await
            .map_err(platform_error)
    }

    async fn send_direct_message(&self, user: &UserRef, text: &str) -> Result<(), PlatformError> {
        let channel = serenity::UserId::new(user.id)
            .create_dm_channel(&self.http)
            .await
            .map_err(platform_error)?;

        channel.say(&self.http, text).await.map_err(platform_error)?;
        Ok(())
    }
}

/// Classify a serenity error. 50013 is "Missing Permissions", 50007 is
/// "Cannot send messages to this user".
fn platform_error(source: serenity::Error) -> PlatformError {
    if let serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)) = &source {
        let status = response.status_code.as_u16();
        if status == 403 || response.error.code == 50013 || response.error.code == 50007 {
            return PlatformError::PermissionDenied;
        }
        if status == 404 {
            return PlatformError::NotFound;
        }
    }

    PlatformError::Delivery(source.to_string())
}
