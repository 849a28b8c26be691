use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::market::Commodity;

const GOOGLE_NEWS_RSS_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Explicit feed URL; overrides the Google News search feed when set
    #[serde(default)]
    pub url: Option<String>,
    /// Google News search query
    #[serde(default = "default_news_query")]
    pub query: String,
    /// Interface language (e.g., "en-US")
    #[serde(default = "default_news_language")]
    pub language: String,
    /// Edition country code (e.g., "US")
    #[serde(default = "default_news_country")]
    pub country: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            query: default_news_query(),
            language: default_news_language(),
            country: default_news_country(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Quote API base URL
    #[serde(default = "default_quote_api_url")]
    pub base_url: String,
    /// Quote polling interval in seconds (0 = disabled)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Commodities shown on the dashboard, in display order
    #[serde(default = "default_commodities")]
    pub commodities: Vec<Commodity>,
    /// Default range for historical queries (e.g., "1mo", "1y")
    #[serde(default = "default_history_range")]
    pub history_range: String,
    /// Default bar interval for historical queries (e.g., "1d")
    #[serde(default = "default_history_interval")]
    pub history_interval: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: default_quote_api_url(),
            poll_interval_secs: default_poll_interval(),
            commodities: default_commodities(),
            history_range: default_history_range(),
            history_interval: default_history_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Enable sentiment and price prediction lookups
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Inference API base URL
    #[serde(default = "default_ai_api_url")]
    pub base_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_ai_api_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            proxy_url: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_news_query() -> String {
    "agriculture".to_string()
}

fn default_news_language() -> String {
    "en-US".to_string()
}

fn default_news_country() -> String {
    "US".to_string()
}

fn default_quote_api_url() -> String {
    "https://plutus-api-550455289977.us-central1.run.app".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_commodities() -> Vec<Commodity> {
    Commodity::ALL.to_vec()
}

fn default_history_range() -> String {
    "1mo".to_string()
}

fn default_history_interval() -> String {
    "1d".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ai_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl FeedConfig {
    /// Resolve the feed URL: the explicit `url`, or a Google News search feed
    pub fn feed_url(&self) -> crate::Result<String> {
        if let Some(ref url) = self.url {
            return Ok(Url::parse(url)?.to_string());
        }

        let language_code = self
            .language
            .split('-')
            .next()
            .unwrap_or(self.language.as_str());
        let ceid = format!("{}:{}", self.country, language_code);

        let url = Url::parse_with_params(
            GOOGLE_NEWS_RSS_URL,
            &[
                ("q", self.query.as_str()),
                ("hl", self.language.as_str()),
                ("gl", self.country.as_str()),
                ("ceid", ceid.as_str()),
            ],
        )?;

        Ok(url.to_string())
    }
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path, falling back to defaults if absent
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/plutus/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("plutus")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.market.poll_interval_secs, 5);
        assert_eq!(config.market.commodities.len(), 8);
        assert_eq!(config.ai.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.http.request_timeout_secs, 30);
        assert!(config.http.proxy_url.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
[market]
poll_interval_secs = 10
commodities = ["corn", "wheat"]

[feed]
query = "soybeans"
"#,
        )
        .unwrap();

        assert_eq!(config.market.poll_interval_secs, 10);
        assert_eq!(config.market.commodities, vec![Commodity::Corn, Commodity::Wheat]);
        assert_eq!(config.feed.query, "soybeans");
        assert_eq!(config.feed.language, "en-US");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[market\npoll = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_default_feed_url() {
        let url = FeedConfig::default().feed_url().unwrap();
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=agriculture&hl=en-US&gl=US&ceid=US%3Aen"
        );
    }

    #[test]
    fn test_explicit_feed_url_wins() {
        let feed = FeedConfig {
            url: Some("https://example.com/rss".to_string()),
            ..FeedConfig::default()
        };
        assert_eq!(feed.feed_url().unwrap(), "https://example.com/rss");
    }

    #[test]
    fn test_query_is_encoded() {
        let feed = FeedConfig {
            query: "corn futures".to_string(),
            ..FeedConfig::default()
        };
        assert!(feed.feed_url().unwrap().contains("q=corn+futures"));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.market.commodities, config.market.commodities);
        assert_eq!(parsed.feed.query, config.feed.query);
    }
}
