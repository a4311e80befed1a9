mod file_handler;

pub use file_handler::ensure_config_dir_exists;

use crate::error::ConfigError;
use file_handler::ConfigFileHandler;

use serde::{Deserialize, Serialize};
use std::env;

const CONFIG_NAME: &str = "config";
const API_KEY_VAR: &str = "KIDTUBE_API_KEY";

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest `maxResults` the playlistItems endpoint accepts.
const MAX_PAGE_SIZE: u32 = 50;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub channel_ids: Vec<String>,
    pub player: String,
    pub api_base_url: String,
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            channel_ids: Vec::new(),
            player: String::from("mpv"),
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    fn with_overrides(
        mut self,
        api_key: Option<String>,
        args: impl Iterator<Item = String>,
    ) -> Self {
        if let Some(api_key) = api_key.filter(|key| !key.is_empty()) {
            self.api_key = api_key;
        }
        if let Some(player) = args.skip_while(|arg| arg != "--player").nth(1) {
            self.player = player;
        }
        self
    }

    fn validate(self, source: &str) -> Result<Self, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey(source.to_owned()));
        }
        if self.channel_ids.is_empty() {
            return Err(ConfigError::NoChannels(source.to_owned()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ConfigError::InvalidPageSize(
                self.page_size,
                source.to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Loads the static configuration once at startup. The result is never written back.
pub async fn load() -> Result<Config, ConfigError> {
    let file_handler = ConfigFileHandler::<Config>::from_config_file(CONFIG_NAME).await?;
    let config = file_handler.read().await?;
    let source = file_handler.path().display().to_string();

    config
        .with_overrides(env::var(API_KEY_VAR).ok(), env::args())
        .validate(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> impl Iterator<Item = String> {
        args.iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("api_key = \"key\"\nchannel_ids = [\"UC1\"]").unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.channel_ids, vec!["UC1"]);
        assert_eq!(config.player, "mpv");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn player_argument_overrides_file() {
        let config = Config::default().with_overrides(None, args(&["kidtube", "--player", "vlc"]));

        assert_eq!(config.player, "vlc");
    }

    #[test]
    fn environment_key_overrides_file() {
        let config = Config {
            api_key: String::from("from-file"),
            ..Default::default()
        };

        let config = config.with_overrides(Some(String::from("from-env")), args(&["kidtube"]));
        assert_eq!(config.api_key, "from-env");

        let config = config.with_overrides(Some(String::new()), args(&["kidtube"]));
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn missing_key_or_channels_is_rejected() {
        let no_key = Config {
            channel_ids: vec![String::from("UC1")],
            ..Default::default()
        };
        assert!(matches!(
            no_key.validate("config.toml"),
            Err(ConfigError::MissingApiKey(_))
        ));

        let no_channels = Config {
            api_key: String::from("key"),
            ..Default::default()
        };
        assert!(matches!(
            no_channels.validate("config.toml"),
            Err(ConfigError::NoChannels(_))
        ));
    }

    #[test]
    fn page_size_must_fit_the_api_limit() {
        let config = |page_size| Config {
            api_key: String::from("key"),
            channel_ids: vec![String::from("UC1")],
            page_size,
            ..Default::default()
        };

        assert!(matches!(
            config(0).validate("config.toml"),
            Err(ConfigError::InvalidPageSize(0, _))
        ));
        assert!(matches!(
            config(51).validate("config.toml"),
            Err(ConfigError::InvalidPageSize(51, _))
        ));
        assert_eq!(config(1).validate("config.toml").unwrap().page_size, 1);
        assert_eq!(config(50).validate("config.toml").unwrap().page_size, 50);
        assert_eq!(
            config(DEFAULT_PAGE_SIZE).validate("config.toml").unwrap().page_size,
            10
        );
    }
}
