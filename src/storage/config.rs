use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::event::{is_valid_time_format, DEFAULT_TIME_FORMAT};

pub const APP_NAME: &str = "newsdesk";
pub const API_URL_ENV: &str = "NEWSDESK_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config: {0}")]
    WriteError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub calendar: CalendarConfig,
    pub ui: UiConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub content_url: String,
    pub admin_url: String,
    pub timeout_seconds: u64,
    pub article_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalendarConfig {
    pub categories: Vec<String>,
    pub max_events_per_day: usize,
    pub upcoming_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub theme: String,
    pub time_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JournalConfig {
    pub path: PathBuf,
}

impl UiConfig {
    /// Replaces a time format chrono cannot render with the default.
    fn check_time_format(&mut self) {
        if !is_valid_time_format(&self.time_format) {
            tracing::warn!("Invalid time_format '{}', using {}", self.time_format, DEFAULT_TIME_FORMAT);
            self.time_format = DEFAULT_TIME_FORMAT.to_string();
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            content_url: "http://localhost:5001".to_string(),
            admin_url: "http://localhost:5002/api".to_string(),
            timeout_seconds: 30,
            article_limit: 50,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { path: config_dir().join("session.json") }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            categories: ["Politics", "Technology", "Business", "Sports", "Entertainment", "Science", "Health"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            max_events_per_day: 3,
            upcoming_count: 5,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: "default".to_string(), time_format: DEFAULT_TIME_FORMAT.to_string() }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { path: config_dir().join("journal.db") }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.ui.check_time_format();
        Ok(config)
    }

    /// Loads the config file, writing defaults on first run, then applies
    /// environment overrides.
    pub fn load_or_create() -> Result<Self, ConfigError> {
        let mut config = Self::load_or_create_at(&Self::config_path())?;
        config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    pub fn load_or_create_at(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            Ok(config)
        }
    }

    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// A non-empty override replaces the content service URL.
    pub fn apply_api_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            tracing::info!("Content URL overridden by {}: {}", API_URL_ENV, url);
            self.api.content_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn default_config_times_out_after_30_seconds() {
        assert_eq!(Config::default().api.timeout_seconds, 30);
    }

    #[test]
    fn default_config_shows_three_events_per_day() {
        assert_eq!(Config::default().calendar.max_events_per_day, 3);
    }

    #[test]
    fn default_categories_are_the_newsroom_desks() {
        let config = Config::default();
        assert_eq!(config.calendar.categories.len(), 7);
        assert_eq!(config.calendar.categories[0], "Politics");
    }

    #[test]
    fn parse_valid_toml_config() {
        let toml_content = r#"
            [api]
            content_url = "https://content.example"
            admin_url = "https://admin.example/api"
            timeout_seconds = 10
            article_limit = 100

            [calendar]
            categories = ["World", "Local"]
            max_events_per_day = 2
            upcoming_count = 8

            [ui]
            theme = "dark"
            time_format = "%I:%M %p"
        "#;

        let config = Config::from_toml(toml_content).unwrap();

        assert_eq!(config.api.content_url, "https://content.example");
        assert_eq!(config.api.article_limit, 100);
        assert_eq!(config.calendar.categories, vec!["World", "Local"]);
        assert_eq!(config.ui.time_format, "%I:%M %p");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = Config::from_toml("[ui]\ntheme = \"light\"\n").unwrap();

        assert_eq!(config.ui.theme, "light");
        assert_eq!(config.ui.time_format, "%H:%M");
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn invalid_time_format_falls_back_to_default() {
        let config = Config::from_toml("[ui]\ntime_format = \"%Q at %H\"\n").unwrap();

        assert_eq!(config.ui.time_format, "%H:%M");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let result = Config::from_toml("this is not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn first_load_writes_defaults_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("newsdesk").join("config.toml");

        let config = Config::load_or_create_at(&path).unwrap();

        assert!(path.exists());
        assert_eq!(Config::load_or_create_at(&path).unwrap(), config);
    }

    #[test]
    fn api_url_override_ignores_blank_values() {
        let mut config = Config::default();

        config.apply_api_url_override(Some("  ".to_string()));
        assert_eq!(config.api.content_url, "http://localhost:5001");

        config.apply_api_url_override(Some("https://staging.example".to_string()));
        assert_eq!(config.api.content_url, "https://staging.example");
    }
}
