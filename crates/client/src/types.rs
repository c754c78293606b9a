use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::JSONRPC_VERSION;

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(method: &'static str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: 1,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Success(RpcSuccessResponse),
    Error(RpcErrorResponse),
}

#[derive(Debug, Deserialize)]
pub struct RpcSuccessResponse {
    pub result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorResponse {
    pub error: RpcErrorMetadata,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorMetadata {
    pub code: i64,
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
}

/// Result of the `block_results` method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockResults {
    #[serde(deserialize_with = "string_or_number")]
    pub height: i64,
    /// `null` for blocks without transactions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub txs_results: Vec<TxResult>,
}

/// Execution result of a single transaction in a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TxResult {
    #[serde(default)]
    pub code: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub log: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<EventAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default)]
    pub index: bool,
}

/// Result of the `block` method, trimmed to the header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockResponse {
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockHeader {
    #[serde(default)]
    pub chain_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub height: i64,
    pub time: DateTime<Utc>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// CometBFT encodes 64-bit integers as JSON strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Height {
        String(String),
        Number(i64),
    }

    match Height::deserialize(deserializer)? {
        Height::String(value) => value.parse().map_err(serde::de::Error::custom),
        Height::Number(value) => Ok(value),
    }
}
