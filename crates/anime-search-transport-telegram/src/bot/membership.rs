//! Channel membership lookup through the Bot API `getChatMember` call.

use anime_search_core::membership::{MembershipProvider, MembershipStatus, PlatformError};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, Recipient};
use teloxide::{ApiError, RequestError};

/// [`MembershipProvider`] backed by a live Telegram bot.
///
/// The bot must be an administrator of the channel, otherwise Telegram refuses
/// to report membership and every user is blocked.
#[derive(Clone)]
pub struct TelegramMembership {
    bot: Bot,
}

impl TelegramMembership {
    /// Wrap a bot handle.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MembershipProvider for TelegramMembership {
    async fn check_membership(
        &self,
        channel_id: &str,
        user_id: i64,
    ) -> Result<MembershipStatus, PlatformError> {
        let user = u64::try_from(user_id)
            .map(UserId)
            .map_err(|_| PlatformError::Api(format!("invalid user id {user_id}")))?;

        let member = self
            .bot
            .get_chat_member(channel_recipient(channel_id), user)
            .await
            .map_err(|e| platform_error(channel_id, e))?;

        Ok(status_from_telegram(member.kind.status()))
    }
}

/// Numeric ids address a chat directly, anything else is a public username.
#[must_use]
pub fn channel_recipient(channel_id: &str) -> Recipient {
    let channel_id = channel_id.trim();
    channel_id.parse::<i64>().map_or_else(
        |_| Recipient::ChannelUsername(channel_id.to_string()),
        |id| Recipient::Id(ChatId(id)),
    )
}

/// Map the Bot API status onto the access policy's vocabulary.
#[must_use]
pub fn status_from_telegram(status: ChatMemberStatus) -> MembershipStatus {
    match status {
        ChatMemberStatus::Member => MembershipStatus::Member,
        ChatMemberStatus::Administrator => MembershipStatus::Administrator,
        ChatMemberStatus::Owner => MembershipStatus::Other("creator".to_string()),
        ChatMemberStatus::Restricted => MembershipStatus::Other("restricted".to_string()),
        ChatMemberStatus::Left => MembershipStatus::Other("left".to_string()),
        ChatMemberStatus::Banned => MembershipStatus::Other("kicked".to_string()),
    }
}

fn platform_error(channel_id: &str, e: RequestError) -> PlatformError {
    match e {
        RequestError::RetryAfter(wait) => PlatformError::RateLimit {
            retry_after_secs: Some(wait.duration().as_secs()),
        },
        RequestError::Network(e) => PlatformError::Network(e.to_string()),
        RequestError::Api(ApiError::ChatNotFound) => {
            PlatformError::InvalidChannel(channel_id.to_string())
        }
        other => PlatformError::Api(other.to_string()),
    }
}
