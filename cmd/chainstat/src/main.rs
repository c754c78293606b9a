pub mod cli;
pub mod config;

use anyhow::Result;
use chainstat_client::CometClient;
use chainstat_stats::{BlockRange, RangeStatsComputer};
use chainstat_utils::{json::write_json, signal::cancel_on_shutdown_signal};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{cli::Cli, config::Config};

fn build_computer(config: &Config) -> Result<RangeStatsComputer<CometClient>> {
    let client = CometClient::builder()
        .urls(config.rpc_urls.iter().cloned())
        .timeout(Duration::from_secs(config.timeout_secs))
        .retry_config(config.retry_config()?)
        .build()?;

    Ok(RangeStatsComputer::new(client, config.stats_options())?)
}

type Prepared = (BlockRange, Config, RangeStatsComputer<CometClient>);

/// Validates the range and the merged configuration and builds the computer.
/// Nothing here touches the network.
fn prepare(cli: &Cli) -> Result<Prepared> {
    let range = cli.block_range()?;
    let config = config::load_config(cli)?;
    let computer = build_computer(&config)?;
    Ok((range, config, computer))
}

#[tokio::main]
async fn main() -> Result<()> {
    chainstat_utils::logging::init();
    let cli = cli::Cli::run();

    if let Some(log_level) = cli.log_level {
        chainstat_utils::logging::change_level(log_level);
    }

    let (range, config, computer) =
        prepare(&cli).unwrap_or_else(|error| cli::usage_error(format!("{error:#}")));

    let shutdown = CancellationToken::new();
    let signals = cancel_on_shutdown_signal(shutdown.clone());
    let computer = computer.with_shutdown(shutdown.clone());

    tracing::info!(
        start = range.start(),
        end = range.end(),
        chunk_size = config.chunk_size,
        concurrency = config.concurrency,
        rpc_urls = ?config.rpc_urls,
        "Computing block statistics"
    );

    let result = computer
        .compute_range_stats(range, |chunk| println!("{chunk}"))
        .await;
    shutdown.cancel();
    if let Err(error) = signals.await {
        tracing::warn!(%error, "Shutdown signal listener failed");
    }

    let stats = result.inspect_err(|error| {
        tracing::error!(error = %error, "Failed to compute block statistics");
    })?;

    if let Some(path) = &config.output {
        write_json(path, &stats)?;
        tracing::info!(path = %path.display(), "Wrote per-chunk statistics");
    }
    tracing::info!(chunks = stats.len(), "Done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use figment::Jail;

    fn prepare_args(args: &[&str]) -> Result<Prepared> {
        let cli = Cli::try_parse_from(["chainstat"].iter().chain(args)).unwrap();
        prepare(&cli)
    }

    #[test]
    fn valid_arguments_prepare_a_computer() {
        Jail::expect_with(|_jail| {
            let (range, config, _computer) = prepare_args(&["100", "250"]).unwrap();
            assert_eq!((range.start(), range.end()), (100, 250));
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn reversed_range_fails_before_any_request() {
        Jail::expect_with(|_jail| {
            let error = prepare_args(&["200", "100"]).err().unwrap();
            assert!(error.to_string().contains("must be less than or equal to"));
            Ok(())
        });
    }

    #[test]
    fn invalid_configuration_fails_before_any_request() {
        Jail::expect_with(|jail| {
            jail.set_env("CHAINSTAT_CHUNK_SIZE", "0");
            let error = prepare_args(&["1", "2"]).err().unwrap();
            assert!(error.to_string().contains("Chunk size"));

            jail.clear_env();
            jail.set_env("CHAINSTAT_MAX_ATTEMPTS", "0");
            assert!(prepare_args(&["1", "2"]).is_err());

            jail.clear_env();
            let error = prepare_args(&["--rpc.url", "not a url", "1", "2"]).err().unwrap();
            assert!(error.to_string().contains("not a url"));
            Ok(())
        });
    }
}
