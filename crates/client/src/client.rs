use crate::{
    constants::{DEFAULT_RPC_URL, DEFAULT_TIMEOUT},
    error::Result,
    request_builder::RequestBuilder,
    retry_config::RetryConfig,
    types::{BlockResponse, BlockResults},
    utils::parse_urls,
};
use chrono::{DateTime, Utc};
use reqwest::{ClientBuilder, Url};
use std::{sync::Arc, time::Duration};

pub struct CometClientBuilder {
    urls: Vec<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl Default for CometClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CometClientBuilder {
    pub fn new() -> Self {
        Self {
            urls: vec![DEFAULT_RPC_URL.to_owned()],
            timeout: DEFAULT_TIMEOUT,
            retry_config: RetryConfig::default(),
        }
    }

    /// Endpoints are tried in the given order until one answers.
    pub fn urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn build(self) -> Result<CometClient> {
        let http_client = ClientBuilder::new().timeout(self.timeout).build()?;

        Ok(CometClient {
            inner: Arc::new(CometClientInner {
                client: http_client,
                urls: parse_urls(self.urls)?,
                retry_config: self.retry_config,
            }),
        })
    }
}

#[derive(Clone)]
pub struct CometClient {
    pub(crate) inner: Arc<CometClientInner>,
}

pub(crate) struct CometClientInner {
    pub(crate) client: reqwest::Client,
    pub(crate) urls: Vec<Url>,
    pub(crate) retry_config: RetryConfig,
}

impl CometClient {
    pub fn builder() -> CometClientBuilder {
        CometClientBuilder::new()
    }

    pub fn urls(&self) -> &[Url] {
        &self.inner.urls
    }

    pub fn request(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self)
    }

    pub async fn block_results(&self, height: i64) -> Result<BlockResults> {
        self.request().block_results(height).await
    }

    pub async fn block(&self, height: i64) -> Result<BlockResponse> {
        self.request().block(height).await
    }

    pub async fn block_time(&self, height: i64) -> Result<DateTime<Utc>> {
        self.request().block_time(height).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(urls: Vec<String>) -> CometClient {
        CometClient::builder()
            .urls(urls)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    #[test]
    fn builder_defaults_to_local_node() {
        let client = CometClient::builder().build().unwrap();
        assert_eq!(client.urls().len(), 1);
        assert_eq!(client.urls()[0].as_str(), "http://localhost:26657/");
    }

    #[test]
    fn builder_rejects_invalid_url() {
        let result = CometClient::builder().urls(["not a url"]).build();
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn block_results_sends_height_as_string() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "jsonrpc": "2.0",
                "method": "block_results",
                "params": {"height": "100"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "height": "100",
                        "txs_results": [
                            {"code": 0, "events": []},
                            {"code": 0, "events": null}
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(vec![server.url()]);
        let results = client.block_results(100).await.unwrap();

        assert_eq!(results.height, 100);
        assert_eq!(results.txs_results.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn block_time_reads_header_time() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "method": "block",
                "params": {"height": "5"}
            })))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "block_id": {"hash": "AB"},
                        "block": {
                            "header": {
                                "chain_id": "test",
                                "height": "5",
                                "time": "2024-01-01T00:00:25Z"
                            }
                        }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(vec![server.url()]);
        let time = client.block_time(5).await.unwrap();

        assert_eq!(time.to_rfc3339(), "2024-01-01T00:00:25+00:00");
    }

    #[tokio::test]
    async fn rpc_error_is_returned_without_retry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {
                        "code": -32603,
                        "message": "Internal error",
                        "data": "height 999 must be less than or equal to the current blockchain height 10"
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = CometClient::builder()
            .urls([server.url()])
            .retry_config(RetryConfig::with_max_attempts(3).unwrap())
            .build()
            .unwrap();
        let error = client.block_results(999).await.unwrap_err();

        assert!(matches!(error, Error::Rpc { code: -32603, .. }));
        assert!(error.to_string().contains("current blockchain height 10"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn falls_back_to_next_endpoint() {
        let mut failing = Server::new_async().await;
        let _failing = failing
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(
                json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32603, "message": "Internal error"}})
                    .to_string(),
            )
            .create_async()
            .await;
        let mut healthy = Server::new_async().await;
        let _healthy = healthy
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(
                json!({"jsonrpc": "2.0", "id": 1, "result": {"height": "3", "txs_results": null}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(vec![failing.url(), healthy.url()]);
        let results = client.block_results(3).await.unwrap();

        assert_eq!(results.height, 3);
        assert!(results.txs_results.is_empty());
    }

    #[tokio::test]
    async fn empty_url_list_is_an_error() {
        let client = CometClient::builder()
            .urls(Vec::<String>::new())
            .build()
            .unwrap();
        let error = client.block(1).await.unwrap_err();
        assert!(matches!(error, Error::NoRPCUrlsConfigured));
    }
}
