//! Outbound messaging for the Telegram bot.
//!
//! Replies are first turned into a list of [`Outbound`] messages, then sent in
//! order with HTML parse mode. Each send is a single attempt.

use anime_search_core::reply::{
    join_prompt, AnimeReply, INVALID_SELECTION_TEXT, NOT_FOUND_TEXT,
};
use anime_search_core::search::Reply;
use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, ParseMode};
use tracing::warn;
use url::Url;

use crate::config::TelegramSettings;

/// One Bot API call worth of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// `sendMessage` with HTML text
    Text(String),
    /// `sendPhoto` with an optional HTML caption
    Photo {
        /// Image location
        url: Url,
        /// Caption, if it fits the caption limit
        caption: Option<String>,
    },
}

/// Translate a reply into the messages that carry it.
#[must_use]
pub fn plan_reply(reply: &Reply, settings: &TelegramSettings) -> Vec<Outbound> {
    match reply {
        Reply::Anime(anime) => plan_anime(anime),
        Reply::InvalidSelection => vec![Outbound::Text(INVALID_SELECTION_TEXT.to_string())],
        Reply::NotFound => vec![Outbound::Text(NOT_FOUND_TEXT.to_string())],
        Reply::JoinChannel => vec![Outbound::Text(join_prompt(
            &settings.channel_join_link,
            &settings.channel_id,
        ))],
    }
}

fn plan_anime(anime: &AnimeReply) -> Vec<Outbound> {
    let url = anime.image.as_deref().and_then(|image| match Url::parse(image) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Skipping cover image {image:?}: {e}");
            None
        }
    });

    match url {
        Some(url) if anime.fits_caption() => vec![Outbound::Photo {
            url,
            caption: Some(anime.caption.clone()),
        }],
        Some(url) => vec![
            Outbound::Photo { url, caption: None },
            Outbound::Text(anime.caption.clone()),
        ],
        None => vec![Outbound::Text(anime.caption.clone())],
    }
}

/// Send planned messages in order.
///
/// # Errors
///
/// Returns the first Telegram error; later messages are not sent.
pub async fn send_outbound(bot: &Bot, chat_id: ChatId, messages: Vec<Outbound>) -> Result<()> {
    for message in messages {
        match message {
            Outbound::Text(text) => {
                bot.send_message(chat_id, text)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            Outbound::Photo { url, caption } => {
                let mut req = bot.send_photo(chat_id, InputFile::url(url));
                if let Some(caption) = caption {
                    req = req.caption(caption).parse_mode(ParseMode::Html);
                }
                req.await?;
            }
        }
    }
    Ok(())
}

/// Plan and send a reply.
///
/// # Errors
///
/// Returns an error if any message fails to send.
pub async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: &Reply,
    settings: &TelegramSettings,
) -> Result<()> {
    send_outbound(bot, chat_id, plan_reply(reply, settings)).await
}
