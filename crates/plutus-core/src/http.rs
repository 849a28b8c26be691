use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Proxy, StatusCode};

use crate::config::HttpConfig;
use crate::{Error, Result};

const CLIENT_USER_AGENT: &str = concat!("plutus/", env!("CARGO_PKG_VERSION"));

/// A response as seen by callers of the transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Bytes,
}

impl TransportResponse {
    /// Build a response, deriving the status text from the status code
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text(status),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with the status text unless the status is 2xx
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Fetch(self.status_text))
        }
    }
}

/// Canonical reason phrase for a status code, or "HTTP <code>" when none is known
pub fn status_text(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Minimal HTTP surface used by the feed parser and the API clients
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, url: &str) -> Result<TransportResponse>;

    /// Issue a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Self::build_client(config.request_timeout_secs, &config.proxy_url)?;
        Ok(Self { client })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(Self::build_headers())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for outgoing requests");
        }

        builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "application/rss+xml,application/xml;q=0.9,application/json;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers
    }

    async fn into_response(response: reqwest::Response) -> Result<TransportResponse> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(TransportResponse::new(status, body))
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        tracing::debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Self::into_response(response).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        tracing::debug!(url, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Self::into_response(response).await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// A recorded request
    #[derive(Debug, Clone, PartialEq)]
    pub struct Request {
        pub method: &'static str,
        pub url: String,
        pub body: Option<serde_json::Value>,
    }

    /// Scripted transport: answers requests in order and records them
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<TransportResponse>>>,
        requests: Mutex<Vec<Request>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(TransportResponse::new(status, body.to_string())));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(Error::Transport(message.to_string())));
            self
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }

        fn next(&self, request: Request) -> Result<TransportResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Transport("no scripted response".to_string())))
        }
    }

    #[async_trait::async_trait]
    impl HttpTransport for MockTransport {
        async fn get(&self, url: &str) -> Result<TransportResponse> {
            self.next(Request {
                method: "GET",
                url: url.to_string(),
                body: None,
            })
        }

        async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
            self.next(Request {
                method: "POST",
                url: url.to_string(),
                body: Some(body.clone()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(404), "Not Found");
        assert_eq!(status_text(200), "OK");
        assert_eq!(status_text(599), "HTTP 599");
    }

    #[test]
    fn test_error_for_status() {
        let ok = TransportResponse::new(204, "");
        assert!(ok.error_for_status().is_ok());

        let err = TransportResponse::new(503, "").error_for_status().unwrap_err();
        assert!(matches!(err, Error::Fetch(ref m) if m == "Service Unavailable"));
    }

    #[tokio::test]
    async fn test_reqwest_transport_get() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rss")
            .with_status(200)
            .with_body("<rss/>")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&HttpConfig::default()).unwrap();
        let response = transport.get(&format!("{}/rss", server.url())).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(&response.body[..], b"<rss/>");
    }

    #[tokio::test]
    async fn test_reqwest_transport_post_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sentiment")
            .match_body(mockito::Matcher::Json(serde_json::json!({"article_title": "Corn rallies"})))
            .with_status(500)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&HttpConfig::default()).unwrap();
        let response = transport
            .post_json(
                &format!("{}/sentiment", server.url()),
                &serde_json::json!({"article_title": "Corn rallies"}),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 500);
        assert_eq!(response.status_text, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_reqwest_transport_connection_failure() {
        let transport = ReqwestTransport::new(&HttpConfig {
            request_timeout_secs: 2,
            proxy_url: None,
        })
        .unwrap();

        // Port 9 (discard) on localhost is not expected to accept HTTP
        let err = transport.get("http://127.0.0.1:9/rss").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let result = ReqwestTransport::new(&HttpConfig {
            request_timeout_secs: 5,
            proxy_url: Some("not a proxy url".to_string()),
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
