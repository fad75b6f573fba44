//! Configuration management for snapprice.
//!
//! Settings come from an optional TOML file, then environment overrides.
//! `DATABASE_URL` is the only value without a default.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "snapprice.toml";

/// Default marketplace root.
pub const DEFAULT_BASE_URL: &str = "https://www.amazon.co.za";

const MAX_FRESHNESS_HOURS: u64 = 24 * 365 * 100;

/// Default categories used when neither the settings file nor the CLI name any.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "laptops",
    "smartphones",
    "headphones",
    "monitors",
    "keyboards",
    "kettles",
    "air fryers",
    "coffee machines",
    "running shoes",
    "backpacks",
    "board games",
    "lego",
];

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("DATABASE_URL is not set (environment, .env, or database_url in the settings file)")]
    MissingDatabaseUrl,
    #[error("invalid selector `{selector}` for {field}: {message}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("no categories configured")]
    NoCategories,
}

/// How the next category is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CategoryOrder {
    #[default]
    Random,
    RoundRobin,
}

/// CSS selectors used to read a search-results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSelectors {
    /// One element per listing card.
    pub card: String,
    /// Attribute on the card or an ancestor holding the listing id.
    pub source_id_attr: String,
    pub title: String,
    pub price: String,
    pub link: String,
    pub image: String,
    /// Pagination indicators; the numeric ones carry page numbers.
    pub pagination: String,
}

impl Default for SearchSelectors {
    fn default() -> Self {
        Self {
            card: "div.a-section.a-spacing-base".to_string(),
            source_id_attr: "data-asin".to_string(),
            title: "span.a-size-base-plus.a-color-base.a-text-normal".to_string(),
            price: "span.a-offscreen".to_string(),
            link: "a.a-link-normal.s-no-outline".to_string(),
            image: "img.s-image".to_string(),
            pagination: "span.s-pagination-item.s-pagination-disabled".to_string(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database URL or path.
    pub database_url: Option<String>,
    /// Marketplace root, without a trailing slash.
    pub base_url: String,
    /// Provenance tag stored with every item.
    pub source: String,
    /// Currency code stored with every price sample.
    pub currency: String,
    /// Hours a price sample stays fresh.
    pub freshness_hours: u64,
    /// Pause between two page fetches.
    pub page_delay_secs: u64,
    pub request_timeout_secs: u64,
    /// User agent: unset for the default, `"impersonate"` for a browser UA,
    /// anything else is sent as-is.
    pub user_agent: Option<String>,
    pub categories: Vec<String>,
    pub category_order: CategoryOrder,
    pub selectors: SearchSelectors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            source: "amazon".to_string(),
            currency: "zar".to_string(),
            freshness_hours: 12,
            page_delay_secs: 5,
            request_timeout_secs: 30,
            user_agent: None,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            category_order: CategoryOrder::Random,
            selectors: SearchSelectors::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from `snapprice.toml` in the working
    /// directory when it exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(settings.with_env_overrides())
    }

    /// Parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env_value("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(base_url) = env_value("SNAPPRICE_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(currency) = env_value("SNAPPRICE_CURRENCY") {
            self.currency = currency;
        }
        if let Some(user_agent) = env_value("SNAPPRICE_USER_AGENT") {
            self.user_agent = Some(user_agent);
        }
        self
    }

    /// The configured database URL.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        // Capped at a century; chrono panics on hour counts near i64::MAX.
        chrono::Duration::hours(self.freshness_hours.min(MAX_FRESHNESS_HOURS) as i64)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
