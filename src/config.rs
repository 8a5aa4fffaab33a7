use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_page_size() -> u32 {
    9
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_tick_rate() -> f64 {
    30.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            tick_rate_fps: default_tick_rate(),
        }
    }
}

impl AppConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Replace values that would make the client misbehave with defaults.
    fn sanitized(mut self) -> Self {
        if url::Url::parse(&self.api_base_url).is_err() {
            tracing::warn!(url = %self.api_base_url, "invalid api_base_url, using default");
            self.api_base_url = default_api_base_url();
        }
        if self.page_size == 0 {
            self.page_size = default_page_size();
        }
        if !(self.tick_rate_fps.is_finite() && self.tick_rate_fps > 0.0) {
            self.tick_rate_fps = default_tick_rate();
        }
        self
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/recipeshare-people"))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

pub fn load_config() -> AppConfig {
    let config = read_config_file().unwrap_or_default();
    with_url_override(config, std::env::var("RECIPESHARE_API_URL").ok()).sanitized()
}

fn with_url_override(mut config: AppConfig, url: Option<String>) -> AppConfig {
    if let Some(url) = url
        && !url.trim().is_empty()
    {
        config.api_base_url = url;
    }
    config
}

fn read_config_file() -> Option<AppConfig> {
    let contents = fs::read_to_string(config_path()?).ok()?;
    parse_config(&contents)
}

fn parse_config(contents: &str) -> Option<AppConfig> {
    match toml::from_str(contents) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("ignoring malformed config: {e}");
            None
        }
    }
}
