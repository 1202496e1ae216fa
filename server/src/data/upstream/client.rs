use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

use super::error::UpstreamError;
use super::source::ListingSource;
use crate::core::config::UpstreamConfig;
use crate::core::constants::APP_NAME;
use crate::domain::listings::ListingQuery;

/// RESO OData client for the Spark replication API
#[derive(Debug)]
pub struct SparkClient {
    client: reqwest::Client,
    base_url: String,
}

impl SparkClient {
    /// Build the client once; the bearer token is fixed for its lifetime.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| UpstreamError::Config("no API token configured".to_string()))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| UpstreamError::Config(format!("invalid API token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        // 0 disables the deadline
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "MLS client initialized"
        );
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl ListingSource for SparkClient {
    async fn fetch(&self, query: &ListingQuery) -> Result<Value, UpstreamError> {
        let url = query.to_url(&self.base_url);
        tracing::debug!(url = %url, "Querying MLS API");

        let resp = self.client.get(url.as_str()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::status(status));
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "spark"
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn config(base_url: String, token: Option<&str>) -> UpstreamConfig {
        UpstreamConfig {
            base_url,
            token: token.map(String::from),
            timeout_secs: 5,
            feed_page_size: 18,
            search_page_size: 300,
        }
    }

    #[test]
    fn test_missing_token_rejected() {
        let err = SparkClient::new(&config("http://localhost".into(), None)).unwrap_err();
        assert!(matches!(err, UpstreamError::Config(_)));

        let err = SparkClient::new(&config("http://localhost".into(), Some(""))).unwrap_err();
        assert!(matches!(err, UpstreamError::Config(_)));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let err =
            SparkClient::new(&config("http://localhost".into(), Some("bad\ntoken"))).unwrap_err();
        assert!(matches!(err, UpstreamError::Config(_)));
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/Property")
                    .header("authorization", "Bearer secret")
                    .query_param("$orderby", "ModificationTimestamp desc")
                    .query_param("$top", "300")
                    .query_param("$expand", "Media")
                    .query_param("$filter", "City eq 'O''Fallon'");
                then.status(200)
                    .json_body(json!({"value": [{"ListingKey": "1"}]}));
            })
            .await;

        let client = SparkClient::new(&config(server.url("/Property"), Some("secret"))).unwrap();
        let query = ListingQuery::new(Some("City eq 'O''Fallon'".to_string()), 300);
        let body = client.fetch(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, json!({"value": [{"ListingKey": "1"}]}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/Property");
                then.status(401).body("unauthorized");
            })
            .await;

        let client = SparkClient::new(&config(server.url("/Property"), Some("secret"))).unwrap();
        let err = client
            .fetch(&ListingQuery::new(None, 18))
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { status, reason } => {
                assert_eq!(status, 401);
                assert_eq!(reason, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/Property");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let client = SparkClient::new(&config(server.url("/Property"), Some("secret"))).unwrap();
        let err = client
            .fetch(&ListingQuery::new(None, 18))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // Port 9 (discard) is closed on test machines
        let client =
            SparkClient::new(&config("http://127.0.0.1:9/Property".into(), Some("secret")))
                .unwrap();
        let err = client
            .fetch(&ListingQuery::new(None, 18))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Http(_)));
    }
}
