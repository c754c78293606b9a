pub type Result<T> = core::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("start_block_height ({start}) must be less than or equal to end_block_height ({end})")]
    InvalidRange { start: i64, end: i64 },
    #[error("Chunk size must be at least 1")]
    InvalidChunkSize,
    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,
    #[error("Failed to get block results for height {height}: {source}")]
    BlockResults { height: i64, source: BoxError },
    #[error("Failed to get block {height}: {source}")]
    Block { height: i64, source: BoxError },
    #[error("Block task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Computation cancelled")]
    Cancelled,
}
