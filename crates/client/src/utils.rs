use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    retry_config::RetryConfig,
    types::{RpcRequest, RpcResponse},
};

pub fn parse_urls(urls: Vec<String>) -> Result<Vec<Url>> {
    urls.into_iter()
        .map(|url| {
            Url::parse(&url).map_err(|e| Error::InvalidUrl {
                url,
                reason: e.to_string(),
            })
        })
        .collect()
}

pub fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::TimeOut => true,
        Error::Reqwest(error) => error.is_connect(),
        _ => false,
    }
}

/// Tries every endpoint in order and returns the first success.
pub async fn send_request_sequential<T>(
    client: &reqwest::Client,
    request: &RpcRequest,
    urls: &[Url],
    retry_config: &RetryConfig,
) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut last_error = Error::NoRPCUrlsConfigured;

    for url in urls {
        match send_request_with_retry(client, request, url, retry_config).await {
            Ok(response) => return Ok(response),
            Err(error) => {
                tracing::warn!(%url, method = request.method, error = %error, "Endpoint failed");
                last_error = error;
            }
        }
    }

    Err(last_error)
}

pub async fn send_request_with_retry<T>(
    client: &reqwest::Client,
    request: &RpcRequest,
    url: &Url,
    retry_config: &RetryConfig,
) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut attempt = 0;
    let mut delay = retry_config.initial_delay;
    let mut last_error = None;

    while attempt < retry_config.max_attempts {
        attempt += 1;

        match send_request_once(client, request, url).await {
            Ok(response) => return Ok(response),
            Err(error) => {
                tracing::debug!(
                    error = %error,
                    attempt = attempt,
                    max_attempts = retry_config.max_attempts,
                    method = request.method,
                    "Request failed"
                );

                if is_retryable_error(&error) && attempt < retry_config.max_attempts {
                    tracing::info!(
                        delay = ?delay,
                        attempt = attempt,
                        max_attempts = retry_config.max_attempts,
                        "Retrying request"
                    );
                    tokio::time::sleep(delay).await;

                    delay = retry_config.next_delay(delay);
                    last_error = Some(error);
                } else {
                    return Err(error);
                }
            }
        }
    }

    Err(last_error.unwrap_or(Error::RetryFailed(retry_config.max_attempts as u64)))
}

pub async fn send_request_once<T>(
    client: &reqwest::Client,
    request: &RpcRequest,
    url: &Url,
) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = client
        .post(url.as_ref())
        .header("content-type", "application/json")
        .body(serde_json::to_string(request)?)
        .send()
        .await
        .map_err(|error| {
            if error.is_timeout() {
                Error::TimeOut
            } else {
                Error::Reqwest(error)
            }
        })?
        .json::<RpcResponse>()
        .await?;

    match response {
        RpcResponse::Success(ok_response) => Ok(serde_json::from_value::<T>(ok_response.result)?),
        RpcResponse::Error(error_response) => Err(Error::Rpc {
            code: error_response.error.code,
            message: error_response.error.message,
            data: error_response.error.data,
        }),
    }
}
