//! Configuration and settings management
//!
//! Layers optional config files and environment variables into typed settings.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Default location of the anime dataset, relative to the working directory.
pub const DEFAULT_ANIME_DATA_PATH: &str = "./animeData.json";

/// Dataset-related settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogSettings {
    /// Path to the JSON file holding the anime records
    #[serde(default = "default_anime_data_path")]
    pub anime_data_path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            anime_data_path: default_anime_data_path(),
        }
    }
}

fn default_anime_data_path() -> String {
    DEFAULT_ANIME_DATA_PATH.to_string()
}

impl CatalogSettings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use anime_search_core::config::CatalogSettings;
    ///
    /// let settings = CatalogSettings::new().expect("Failed to load configuration");
    /// println!("{}", settings.anime_data_path);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }
}

/// Build the layered configuration shared by every settings struct.
///
/// Sources, lowest priority first: `config/default`, `config/{RUN_MODE}`,
/// `config/local`, `APP__*` variables, then plain environment variables.
///
/// # Errors
///
/// Returns a `ConfigError` if a present config file cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP__PORT=8080 ./target/app` would set the `port` key
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE maps to snake_case; empty vars count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}
