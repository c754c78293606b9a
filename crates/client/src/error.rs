pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid max attempts: {0}")]
    InvalidMaxAttempts(u64),
    #[error("Invalid RPC URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("No RPC URLs configured")]
    NoRPCUrlsConfigured,
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Retry failed after {0} attempts")]
    RetryFailed(u64),
    #[error("RPC error {code}: {message} {data}")]
    Rpc {
        code: i64,
        message: String,
        data: String,
    },
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Connection timed out")]
    TimeOut,
}
