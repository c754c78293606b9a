use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://localhost:26657";

pub(crate) const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(100);
pub(crate) const BACKOFF_FACTOR: u32 = 2;
pub(crate) const MAX_DELAY: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// A single attempt per endpoint, i.e. no retry.
pub(crate) const DEFAULT_MAX_ATTEMPTS: usize = 1;

pub(crate) const JSONRPC_VERSION: &str = "2.0";
pub(crate) const METHOD_BLOCK: &str = "block";
pub(crate) const METHOD_BLOCK_RESULTS: &str = "block_results";
