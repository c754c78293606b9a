use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    CometClient,
    constants::{METHOD_BLOCK, METHOD_BLOCK_RESULTS},
    error::{Error, Result},
    types::{BlockResponse, BlockResults, RpcRequest},
    utils::send_request_sequential,
};

pub struct RequestBuilder<'a> {
    client: &'a CometClient,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(client: &'a CometClient) -> Self {
        Self { client }
    }

    fn get_target_urls(&self) -> Result<&[Url]> {
        let urls = self.client.inner.urls.as_slice();
        if urls.is_empty() {
            return Err(Error::NoRPCUrlsConfigured);
        }
        Ok(urls)
    }

    async fn send_rpc_request<T>(&self, request: &RpcRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let urls = self.get_target_urls()?;
        let inner = &self.client.inner;

        send_request_sequential(&inner.client, request, urls, &inner.retry_config).await
    }

    pub async fn block_results(self, height: i64) -> Result<BlockResults> {
        let request = RpcRequest::new(
            METHOD_BLOCK_RESULTS,
            json!({ "height": height.to_string() }),
        );

        self.send_rpc_request(&request).await
    }

    pub async fn block(self, height: i64) -> Result<BlockResponse> {
        let request = RpcRequest::new(METHOD_BLOCK, json!({ "height": height.to_string() }));

        self.send_rpc_request(&request).await
    }

    pub async fn block_time(self, height: i64) -> Result<DateTime<Utc>> {
        Ok(self.block(height).await?.block.header.time)
    }
}
