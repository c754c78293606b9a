mod computer;
mod error;
mod range;
mod source;
mod tx;

pub use computer::{
    ChunkStats, DEFAULT_MAX_CONCURRENCY, RangeStats, RangeStatsComputer, StatsOptions,
};
pub use error::{Error, Result};
pub use range::{BlockRange, Chunk, Chunks, DEFAULT_CHUNK_SIZE};
pub use source::BlockDataSource;
pub use tx::{BlockTxSummary, count_valid_txs, is_failed_eth_tx};
