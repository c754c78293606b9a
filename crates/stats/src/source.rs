use chainstat_client::{CometClient, types::TxResult};
use chrono::{DateTime, Utc};

/// Per-block data the statistics are computed from.
#[trait_variant::make(Send)]
pub trait BlockDataSource: Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execution results of every transaction in the block at `height`.
    async fn block_results(&self, height: i64) -> Result<Vec<TxResult>, Self::Error>;

    /// Header timestamp of the block at `height`.
    async fn block_time(&self, height: i64) -> Result<DateTime<Utc>, Self::Error>;
}

impl BlockDataSource for CometClient {
    type Error = chainstat_client::error::Error;

    async fn block_results(&self, height: i64) -> Result<Vec<TxResult>, Self::Error> {
        Ok(CometClient::block_results(self, height).await?.txs_results)
    }

    async fn block_time(&self, height: i64) -> Result<DateTime<Utc>, Self::Error> {
        CometClient::block_time(self, height).await
    }
}
