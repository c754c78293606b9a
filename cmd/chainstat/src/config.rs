use std::path::PathBuf;

use chainstat_client::{DEFAULT_RPC_URL, RetryConfig};
use chainstat_stats::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CONCURRENCY, StatsOptions};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cli::Cli;

const ENV_PREFIX: &str = "CHAINSTAT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "url_list")]
    pub rpc_urls: Vec<String>,
    pub timeout_secs: u64,
    pub max_attempts: usize,
    pub chunk_size: u64,
    pub concurrency: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_urls: vec![DEFAULT_RPC_URL.to_owned()],
            timeout_secs: 10,
            max_attempts: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: DEFAULT_MAX_CONCURRENCY,
            output: None,
        }
    }
}

impl Config {
    pub fn stats_options(&self) -> StatsOptions {
        StatsOptions {
            chunk_size: self.chunk_size,
            max_concurrency: self.concurrency,
        }
    }

    pub fn retry_config(&self) -> chainstat_client::error::Result<RetryConfig> {
        RetryConfig::with_max_attempts(self.max_attempts)
    }
}

/// Accepts a list or a comma separated string, so that
/// `CHAINSTAT_RPC_URLS=http://a:26657,http://b:26657` works like `--rpc.url`.
fn url_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Urls {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Urls::deserialize(deserializer)? {
        Urls::List(urls) => urls,
        Urls::Joined(urls) => urls
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .collect(),
    })
}

/// Defaults, then the `--config` file, then `CHAINSTAT_*` variables, then
/// the options given on the command line.
pub(crate) fn load_config(cli: &Cli) -> Result<Config, Box<figment::Error>> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    if let Some(path) = &cli.config {
        if !path.is_file() {
            return Err(Box::new(figment::Error::from(format!(
                "config file {} does not exist",
                path.display()
            ))));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(&cli.options))
        .extract()?;
    Ok(config)
}
