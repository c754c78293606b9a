//! JSON-RPC client for the query interface of CometBFT nodes.

mod client;
mod constants;
pub mod error;
pub mod request_builder;
mod retry_config;
pub mod types;
mod utils;

pub use client::{CometClient, CometClientBuilder};
pub use constants::DEFAULT_RPC_URL;
pub use retry_config::RetryConfig;

