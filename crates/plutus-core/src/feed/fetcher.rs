use std::sync::Arc;

use url::Url;

use super::models::ArticleRecord;
use super::parser::parse_feed;
use crate::config::{AppConfig, HttpConfig};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::{Error, Result};

const MAX_FEED_BYTES: usize = 5 * 1024 * 1024;

/// Fetches one RSS feed and turns it into article records.
///
/// The parser keeps no state between calls: every `parse()` issues a fresh
/// request and builds a fresh list.
pub struct FeedParser {
    url: String,
    transport: Arc<dyn HttpTransport>,
}

impl FeedParser {
    /// Create a parser for `url` with a default HTTP client
    pub fn new(url: &str) -> Result<Self> {
        let transport = ReqwestTransport::new(&HttpConfig::default())?;
        Self::with_transport(url, Arc::new(transport))
    }

    /// Create a parser for the configured feed with the configured HTTP settings
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.http)?;
        Self::with_transport(&config.feed.feed_url()?, Arc::new(transport))
    }

    /// Create a parser that issues its requests through `transport`
    pub fn with_transport(url: &str, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Url::parse(url)?;

        Ok(Self {
            url: url.to_string(),
            transport,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed and project every item, in document order
    pub async fn parse(&self) -> Result<Vec<ArticleRecord>> {
        tracing::debug!("Fetching feed from: {}", self.url);

        let response = self.transport.get(&self.url).await?.error_for_status()?;

        if response.body.len() > MAX_FEED_BYTES {
            return Err(Error::Parse(format!(
                "Feed too large ({} bytes) for URL: {}",
                response.body.len(),
                self.url
            )));
        }

        let records = parse_feed(&response.body)?;
        tracing::debug!("Parsed {} articles from {}", records.len(), self.url);

        Ok(records)
    }
}
