use crate::bot::messaging::{send_outbound, send_reply, Outbound};
use crate::config::BotSettings;
use anime_search_core::reply::{welcome_text, MESSAGE_LIMIT};
use anime_search_core::search::AnimeSearch;
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};
use tracing::{debug, info};

// Helper function to get user name from Message
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message. A deep-link payload (`/start <payload>`) is
    /// accepted and ignored.
    #[command(description = "Start the bot.")]
    Start(String),
    /// List every available title with its number
    #[command(description = "List available anime.")]
    List,
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);

    info!("User {user_id} ({user_name}) initiated /start command.");

    bot.send_message(msg.chat.id, welcome_text())
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

/// Title list handler, gated by channel membership
///
/// # Errors
///
/// Returns an error if any part of the list cannot be sent.
pub async fn list(
    bot: Bot,
    msg: Message,
    search: Arc<AnimeSearch>,
    settings: Arc<BotSettings>,
) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    info!("User {user_id} requested the title list.");

    match search.list_titles(user_id, MESSAGE_LIMIT).await {
        Ok(parts) => {
            debug!("Sending title list to user {user_id} in {} part(s).", parts.len());
            let messages = parts.into_iter().map(Outbound::Text).collect();
            send_outbound(&bot, msg.chat.id, messages).await
        }
        Err(reply) => send_reply(&bot, msg.chat.id, &reply, &settings.telegram).await,
    }
}

/// Free-text lookup handler
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    search: Arc<AnimeSearch>,
    settings: Arc<BotSettings>,
) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let text = msg.text().unwrap_or_default();

    debug!("User {user_id} sent query {text:?}");
    let reply = search.handle_query(user_id, text).await;
    send_reply(&bot, msg.chat.id, &reply, &settings.telegram).await
}
