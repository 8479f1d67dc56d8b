//! Telegram transport settings.

use anime_search_core::config::CatalogSettings;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder used when no gating channel is configured.
pub const DEFAULT_CHANNEL_ID: &str = "YOUR_CHANNEL_ID_OR_USERNAME";
/// Invite link shown to users who are not channel members.
pub const DEFAULT_CHANNEL_JOIN_LINK: &str = "https://t.me/+Rj421cRLWeIyZjlk";
/// Port of the liveness HTTP endpoint.
pub const DEFAULT_PORT: u16 = 3000;

/// Telegram transport settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramSettings {
    /// Telegram Bot API token.
    pub telegram_bot_token: String,
    /// Channel users must join: `@username` or numeric chat id.
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    /// Invite link sent to blocked users.
    #[serde(default = "default_channel_join_link")]
    pub channel_join_link: String,
    /// Liveness HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_channel_id() -> String {
    DEFAULT_CHANNEL_ID.to_string()
}

fn default_channel_join_link() -> String {
    DEFAULT_CHANNEL_JOIN_LINK.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Combined settings used by the Telegram transport layer.
#[derive(Clone)]
pub struct BotSettings {
    /// Dataset settings.
    pub catalog: Arc<CatalogSettings>,
    /// Telegram-specific settings.
    pub telegram: Arc<TelegramSettings>,
}

impl BotSettings {
    /// Create a new combined settings bundle.
    #[must_use]
    pub fn new(catalog: CatalogSettings, telegram: TelegramSettings) -> Self {
        Self {
            catalog: Arc::new(catalog),
            telegram: Arc::new(telegram),
        }
    }
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the token is missing.
    pub fn new() -> Result<Self, ConfigError> {
        anime_search_core::config::build_config()?.try_deserialize()
    }
}
