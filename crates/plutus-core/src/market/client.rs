use std::sync::Arc;

use serde_json::{Map, Value};
use url::Url;

use super::models::{Commodity, CommodityQuote, HistoricalPoint, HistoricalSeries};
use crate::config::AppConfig;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::{Error, Result};

const QUOTE_PATH: &str = "quote";
const HISTORICAL_PATH: &str = "historical";

/// Client for the quote API (`/quote/{ticker}` and `/historical/{ticker}`)
#[derive(Clone)]
pub struct QuoteClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl QuoteClient {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Url::parse(base_url)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.http)?;
        Self::new(&config.market.base_url, Arc::new(transport))
    }

    fn endpoint(&self, path: &str, commodity: Commodity) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/{}/{}",
            self.base_url,
            path,
            commodity.ticker()
        ))?)
    }

    /// Latest quote for one commodity
    pub async fn quote(&self, commodity: Commodity) -> Result<CommodityQuote> {
        let url = self.endpoint(QUOTE_PATH, commodity)?;
        tracing::debug!(%commodity, "Fetching quote");

        let response = self.transport.get(url.as_str()).await?.error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Historical bars, e.g. `historical(Commodity::Corn, "1mo", "1d")`
    pub async fn historical(
        &self,
        commodity: Commodity,
        range: &str,
        interval: &str,
    ) -> Result<HistoricalSeries> {
        let mut url = self.endpoint(HISTORICAL_PATH, commodity)?;
        url.query_pairs_mut()
            .append_pair("range", range)
            .append_pair("interval", interval);
        tracing::debug!(%commodity, range, interval, "Fetching historical data");

        let response = self.transport.get(url.as_str()).await?.error_for_status()?;
        let body: Value = serde_json::from_slice(&response.body)?;

        let points = body
            .get("Data")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Parse("Historical response has no Data array".to_string()))?
            .iter()
            .map(decode_point)
            .collect::<Result<Vec<_>>>()?;

        Ok(HistoricalSeries { commodity, points })
    }
}

/// Decode one bar; the API capitalises its keys, so they are matched case-insensitively
fn decode_point(value: &Value) -> Result<HistoricalPoint> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::Parse("Historical data point is not an object".to_string()))?;

    let lowered: Map<String, Value> = object
        .iter()
        .map(|(key, value)| (key.to_lowercase(), value.clone()))
        .collect();

    Ok(serde_json::from_value(Value::Object(lowered))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use crate::market::Trend;

    const BASE: &str = "https://quotes.example.com/";

    fn client(transport: MockTransport) -> (QuoteClient, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        (QuoteClient::new(BASE, transport.clone()).unwrap(), transport)
    }

    #[tokio::test]
    async fn test_quote() {
        let (client, transport) = client(MockTransport::new().respond(
            200,
            r#"{"regularMarketPrice": 12.5, "regularMarketChangePercent": 0.8, "shortName": "Rough Rice"}"#,
        ));

        let quote = client.quote(Commodity::Rice).await.unwrap();

        assert_eq!(transport.requests()[0].url, "https://quotes.example.com/quote/ZR=F");
        assert_eq!(quote.short_name, "Rough Rice");
        assert_eq!(quote.trend(), Trend::Up);
    }

    #[tokio::test]
    async fn test_quote_error_status() {
        let (client, _) = client(MockTransport::new().respond(502, "upstream"));

        let err = client.quote(Commodity::Corn).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(ref m) if m == "Bad Gateway"));
    }

    #[tokio::test]
    async fn test_quote_bad_json() {
        let (client, _) = client(MockTransport::new().respond(200, "<html>"));

        let err = client.quote(Commodity::Corn).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_historical_lowercases_keys() {
        let (client, transport) = client(MockTransport::new().respond(
            200,
            r#"{"Data": [
                {"Time": 1700000000, "Open": 4.0, "Close": 4.2, "High": 4.3, "Low": 3.9, "Volume": 1200},
                {"Time": 1700086400, "Open": 4.2, "Close": 5.0, "High": 5.1, "Low": 4.1, "Volume": 900}
            ]}"#,
        ));

        let series = client.historical(Commodity::Wheat, "1mo", "1d").await.unwrap();

        assert_eq!(
            transport.requests()[0].url,
            "https://quotes.example.com/historical/KE=F?range=1mo&interval=1d"
        );
        assert_eq!(series.commodity, Commodity::Wheat);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].time, 1700000000);
        assert_eq!(series.points[1].volume, 900.0);
        assert_eq!(series.change_percent(), Some(25.0));
    }

    #[tokio::test]
    async fn test_historical_without_data_fails() {
        let (client, _) = client(MockTransport::new().respond(200, r#"{"Error": "no data"}"#));

        let err = client.historical(Commodity::Hogs, "1y", "1wk").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let (client, _) = client(MockTransport::new().fail("timed out"));

        let err = client.quote(Commodity::Cattle).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
