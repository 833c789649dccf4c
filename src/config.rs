use std::time::Duration;

use serde::Deserialize;

use crate::services::{matcher::DEFAULT_FALLBACK_LIMIT, pricing::PriceStyle, MatchOptions};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Coco backend base URL
    #[serde(default = "default_coco_api_url")]
    pub coco_api_url: String,

    /// Coco backend API key (optional)
    #[serde(default)]
    pub coco_api_key: Option<String>,

    /// Timeout applied to every backend request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Leading search results to choose from when nothing matches a destination
    #[serde(default = "default_fallback_candidate_limit")]
    pub fallback_candidate_limit: usize,

    /// Card price style: `iso` or `local`
    #[serde(default)]
    pub price_style: PriceStyle,

    /// Run one recommendation refresh when the server starts
    #[serde(default = "default_refresh_on_startup")]
    pub refresh_on_startup: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_coco_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_fallback_candidate_limit() -> usize {
    DEFAULT_FALLBACK_LIMIT
}

fn default_refresh_on_startup() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of `(NAME, value)` pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.coco_api_url.starts_with("http://") && !self.coco_api_url.starts_with("https://") {
            anyhow::bail!("COCO_API_URL must be an http or https URL");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        if self.fallback_candidate_limit == 0 {
            anyhow::bail!("FALLBACK_CANDIDATE_LIMIT must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            fallback_limit: self.fallback_candidate_limit,
            price_style: self.price_style,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
