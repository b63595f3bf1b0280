use anyhow::{Context, Result};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://random-data-api.com/api/v2";

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};
pub const DEFAULT_ADD_SIZE: NonZeroUsize = NonZeroUsize::MIN;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// No timeout is imposed unless set; the transport default applies.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Records fetched on mount and on every refresh.
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,
    /// Records fetched by the add intent; only the first is kept.
    #[serde(default = "default_add_size")]
    pub add_size: NonZeroUsize,
}

fn default_page_size() -> NonZeroUsize {
    DEFAULT_PAGE_SIZE
}

fn default_add_size() -> NonZeroUsize {
    DEFAULT_ADD_SIZE
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            add_size: default_add_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvatarSide {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default)]
    pub avatar_side: AvatarSide,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "Random User Generator".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            avatar_side: AvatarSide::default(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_file() -> String {
    "random-user-feed.log".to_string()
}

fn default_log_filter() -> String {
    "random_user_feed=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
