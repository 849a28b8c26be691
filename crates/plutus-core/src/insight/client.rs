use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use super::models::{PricePrediction, Sentiment};
use crate::config::AppConfig;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::market::Commodity;
use crate::Result;

/// Client for the inference API (sentiment and price prediction)
#[derive(Clone)]
pub struct InsightClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl InsightClient {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Url::parse(base_url)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.http)?;
        Self::new(&config.ai.base_url, Arc::new(transport))
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.transport.post_json(&url, &body).await?.error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Classify the sentiment of an article title
    pub async fn sentiment(&self, title: &str) -> Result<Sentiment> {
        tracing::debug!("Requesting sentiment for: {}", title);
        self.post("sentiment", json!({ "article_title": title })).await
    }

    /// Day, month and year price predictions for a commodity
    pub async fn price_prediction(&self, commodity: Commodity) -> Result<PricePrediction> {
        tracing::debug!(%commodity, "Requesting price prediction");
        self.post("price_prediction", json!({ "ticker": commodity.ticker() }))
            .await
    }
}
