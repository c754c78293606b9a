use chainstat_stats::BlockRange;
use clap::{
    Args, CommandFactory, Parser, builder::RangedU64ValueParser, error::ErrorKind,
};
use serde::Serialize;
use std::{fmt, path::PathBuf};
use tracing::Level;

/// Exit status of every usage error, including the ones clap reports.
pub const USAGE_EXIT_CODE: i32 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "chainstat",
    author,
    version,
    about = "Prints average transactions, block time and TPS per 100-block chunk of a CometBFT chain.",
    arg_required_else_help = true,
    allow_negative_numbers = true
)]
pub struct Cli {
    #[arg(
        value_name = "START_BLOCK_HEIGHT",
        help = "First block height of the range (inclusive)."
    )]
    pub start_block_height: i64,

    #[arg(
        value_name = "END_BLOCK_HEIGHT",
        help = "Last block height of the range (inclusive)."
    )]
    pub end_block_height: i64,

    #[arg(
        long = "log.level",
        value_name = "LOG_LEVEL",
        help = "The verbosity level used for logs.",
        long_help = "Possible values: info, debug, trace, warn, error",
        help_heading = "General options"
    )]
    pub log_level: Option<Level>,

    #[arg(
        long = "config",
        value_name = "CONFIG_FILE",
        help = "TOML file with default option values.",
        help_heading = "General options"
    )]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: Options,
}

impl Cli {
    pub fn run() -> Self {
        Self::try_parse().unwrap_or_else(|error| exit_with(error))
    }

    pub fn block_range(&self) -> chainstat_stats::Result<BlockRange> {
        BlockRange::new(self.start_block_height, self.end_block_height)
    }
}

/// Options that can also come from the config file or `CHAINSTAT_*`
/// variables. Unset options are not serialized so lower layers show through.
#[derive(Args, Debug, Default, Serialize)]
pub struct Options {
    #[arg(
        long = "rpc.url",
        value_name = "URL",
        value_delimiter = ',',
        help = "Comma separated CometBFT RPC endpoints, tried in order. [default: http://localhost:26657]",
        long_help = "Comma separated CometBFT RPC endpoints, tried in order. Also read from CHAINSTAT_RPC_URLS (comma separated) or `rpc_urls = [..]` in the config file. [default: http://localhost:26657]",
        help_heading = "RPC options"
    )]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rpc_urls: Vec<String>,

    #[arg(
        long = "rpc.timeout",
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout of a single RPC request. [default: 10]",
        help_heading = "RPC options"
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[arg(
        long = "rpc.max-attempts",
        value_name = "ATTEMPTS",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
        help = "Attempts per request and endpoint before giving up. [default: 1]",
        help_heading = "RPC options"
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<usize>,

    #[arg(
        long = "chunk-size",
        value_name = "BLOCKS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Number of blocks aggregated per output line. [default: 100]",
        help_heading = "Statistics options"
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u64>,

    #[arg(
        long = "concurrency",
        value_name = "REQUESTS",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
        help = "Maximum number of block requests in flight. [default: 100]",
        help_heading = "Statistics options"
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    #[arg(
        long = "output",
        value_name = "JSON_FILE",
        help = "Also write the per-chunk averages to this JSON file.",
        help_heading = "Statistics options"
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Reports `message` like a clap usage error and exits.
pub fn usage_error(message: impl fmt::Display) -> ! {
    let error = Cli::command().error(ErrorKind::ValueValidation, message);
    exit_with(error)
}

fn exit_with(error: clap::Error) -> ! {
    let code = if error.use_stderr() { USAGE_EXIT_CODE } else { 0 };
    let _ = error.print();
    std::process::exit(code)
}
