use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    error::{Error, Result},
    range::{BlockRange, Chunk, DEFAULT_CHUNK_SIZE},
    source::BlockDataSource,
    tx::BlockTxSummary,
};

pub const DEFAULT_MAX_CONCURRENCY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    /// Maximum number of blocks aggregated into one output line.
    pub chunk_size: u64,
    /// Maximum number of block tasks alive at once.
    pub max_concurrency: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl StatsOptions {
    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        if self.max_concurrency == 0 {
            return Err(Error::InvalidConcurrency);
        }
        Ok(())
    }
}

/// Aggregates of a single chunk.
///
/// A one-block chunk has no time span: `avg_block_time` is NaN and `tps` is
/// infinite (or NaN without transactions). Those values are kept as they are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChunkStats {
    pub chunk: Chunk,
    pub total_valid_txs: u64,
    pub time_diff_secs: f64,
    pub avg_txs: f64,
    pub avg_block_time: f64,
    pub tps: f64,
}

impl ChunkStats {
    pub fn new(chunk: Chunk, total_valid_txs: u64, time_diff_secs: f64) -> Self {
        let txs = total_valid_txs as f64;
        let blocks = chunk.block_count();

        Self {
            chunk,
            total_valid_txs,
            time_diff_secs,
            avg_txs: txs / blocks as f64,
            // n - 1 gaps between n blocks
            avg_block_time: time_diff_secs / (blocks - 1) as f64,
            tps: txs / time_diff_secs,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.avg_txs.is_finite() && self.avg_block_time.is_finite() && self.tps.is_finite()
    }
}

impl fmt::Display for ChunkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Blocks {}-{}: AvgTxs: {:.2}, AvgBlockTime: {:.2}s, TPS={:.2}",
            self.chunk.start, self.chunk.end, self.avg_txs, self.avg_block_time, self.tps
        )
    }
}

/// Index-aligned per-chunk results of a whole range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeStats {
    pub avg_txs_per_chunk: Vec<f64>,
    pub avg_block_time_per_chunk: Vec<f64>,
    pub avg_tps_per_chunk: Vec<f64>,
}

impl RangeStats {
    pub fn push(&mut self, stats: &ChunkStats) {
        self.avg_txs_per_chunk.push(stats.avg_txs);
        self.avg_block_time_per_chunk.push(stats.avg_block_time);
        self.avg_tps_per_chunk.push(stats.tps);
    }

    pub fn len(&self) -> usize {
        self.avg_txs_per_chunk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avg_txs_per_chunk.is_empty()
    }
}

pub struct RangeStatsComputer<S> {
    source: Arc<S>,
    options: StatsOptions,
    shutdown: CancellationToken,
}

impl<S> RangeStatsComputer<S>
where
    S: BlockDataSource + Send,
{
    pub fn new(source: S, options: StatsOptions) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            source: Arc::new(source),
            options,
            shutdown: CancellationToken::new(),
        })
    }

    /// Aborts the computation with [`Error::Cancelled`] once `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Computes the statistics of every chunk of `range`, in increasing height
    /// order, calling `on_chunk` as soon as a chunk is done.
    ///
    /// The first data source error aborts the whole range.
    pub async fn compute_range_stats<F>(
        &self,
        range: BlockRange,
        mut on_chunk: F,
    ) -> Result<RangeStats>
    where
        F: FnMut(&ChunkStats),
    {
        let mut stats = RangeStats::default();

        for chunk in range.chunks(self.options.chunk_size) {
            let chunk_stats = self.compute_chunk_stats(chunk).await?;
            stats.push(&chunk_stats);
            on_chunk(&chunk_stats);
        }

        Ok(stats)
    }

    pub async fn compute_chunk_stats(&self, chunk: Chunk) -> Result<ChunkStats> {
        let total_valid_txs = self.count_valid_txs(chunk).await?;

        let start_time = self.block_time(chunk.start).await?;
        let end_time = if chunk.end == chunk.start {
            start_time
        } else {
            self.block_time(chunk.end).await?
        };

        let stats = ChunkStats::new(chunk, total_valid_txs, seconds_between(start_time, end_time));

        if !stats.is_finite() {
            warn!(
                start = chunk.start,
                end = chunk.end,
                time_diff_secs = stats.time_diff_secs,
                "Chunk has no time span, averages are not finite"
            );
        }
        debug!(
            start = chunk.start,
            end = chunk.end,
            total_valid_txs,
            time_diff_secs = stats.time_diff_secs,
            "Chunk computed"
        );

        Ok(stats)
    }

    /// Sums the valid transactions of every block of `chunk`. At most
    /// `max_concurrency` block tasks exist at any time.
    async fn count_valid_txs(&self, chunk: Chunk) -> Result<u64> {
        let mut heights = chunk.heights();
        let mut tasks = JoinSet::new();
        let mut total_valid_txs = 0;

        // Returning early drops the set, which aborts the tasks still running.
        loop {
            while tasks.len() < self.options.max_concurrency {
                let Some(height) = heights.next() else {
                    break;
                };
                let source = Arc::clone(&self.source);

                tasks.spawn(async move {
                    let txs = source
                        .block_results(height)
                        .await
                        .map_err(|error| Error::BlockResults {
                            height,
                            source: Box::new(error),
                        })?;
                    Ok::<_, Error>(BlockTxSummary::new(height, &txs))
                });
            }

            let joined = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return Err(Error::Cancelled),
                joined = tasks.join_next() => joined,
            };
            let Some(joined) = joined else {
                break;
            };

            let summary = joined??;
            trace!(height = summary.height, valid_txs = summary.valid_txs, "Block counted");
            total_valid_txs += summary.valid_txs;
        }

        Ok(total_valid_txs)
    }

    async fn block_time(&self, height: i64) -> Result<DateTime<Utc>> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(Error::Cancelled),
            time = self.source.block_time(height) => time.map_err(|error| Error::Block {
                height,
                source: Box::new(error),
            }),
        }
    }
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed = end.signed_duration_since(start);
    match elapsed.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => elapsed.num_milliseconds() as f64 / 1e3,
    }
}
