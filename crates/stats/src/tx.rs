use chainstat_client::types::{Event, TxResult};

const ETHEREUM_TX_EVENT: &str = "ethereum_tx";
// Attribute key emitted by the EVM module when an Ethereum tx reverts.
const ETHEREUM_TX_FAILED_KEY: &str = "ethereumTxFailed";

/// Valid transaction count of a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTxSummary {
    pub height: i64,
    pub valid_txs: u64,
}

impl BlockTxSummary {
    pub fn new(height: i64, txs: &[TxResult]) -> Self {
        Self {
            height,
            valid_txs: count_valid_txs(txs),
        }
    }
}

/// Whether `event` marks its transaction as a failed Ethereum transaction.
/// The attribute value is ignored.
pub fn is_failed_eth_tx(event: &Event) -> bool {
    event.kind == ETHEREUM_TX_EVENT
        && event
            .attributes
            .iter()
            .any(|attribute| attribute.key == ETHEREUM_TX_FAILED_KEY)
}

/// Counts the transactions that are not failed Ethereum transactions.
pub fn count_valid_txs(txs: &[TxResult]) -> u64 {
    txs.iter()
        .filter(|tx| !tx.events.iter().any(is_failed_eth_tx))
        .count() as u64
}
