//! Response types for jsonRPC client.

pub mod block_header;
pub mod common;
pub mod transaction;

use serde::{Deserialize, Serialize};

use crate::{
    chain::{
        error::ParseError,
        types::{Block, BlockHeaderInfo},
    },
    jsonrpsee::response::{
        common::amount::{Amount, DecimalAmount},
        transaction::normalize_tx_value,
    },
};

/// Response to a `getblockchaininfo` RPC request.
///
/// Only the fields needed to select chain parameters are kept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetBlockchainInfoResponse {
    /// Current network name as defined in BIP70 (`main`, `test`, `regtest`).
    pub chain: String,

    /// The current number of blocks processed in the server, numeric
    pub blocks: u32,

    /// The hash of the currently best block, in big-endian order, hex-encoded
    #[serde(rename = "bestblockhash", default)]
    pub best_block_hash: String,

    /// The current number of headers we have validated.
    #[serde(default)]
    pub headers: u32,
}

/// Response to an `estimatesmartfee` RPC request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimateSmartFeeResponse {
    /// Estimated fee rate in coins per kilobyte, absent when no estimate is available.
    #[serde(rename = "feerate", default)]
    pub fee_rate: Option<DecimalAmount>,

    /// Errors encountered while estimating.
    #[serde(default)]
    pub errors: Vec<String>,

    /// Block number where the estimate was found.
    #[serde(default)]
    pub blocks: u32,
}

impl EstimateSmartFeeResponse {
    /// Estimated fee rate in smallest units per kilobyte, zero when absent.
    pub fn fee_rate_units(&self, decimals: u32) -> Result<Amount, ParseError> {
        self.fee_rate
            .as_ref()
            .map(|rate| rate.to_amount(decimals))
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// True if the node reported errors alongside (or instead of) an estimate.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Response to a `getblock` RPC request with verbosity 2.
///
/// Used when blocks are not parsed from raw bytes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetBlockVerboseResponse {
    /// Block hash.
    pub hash: String,
    /// Confirmations in the best chain.
    #[serde(default)]
    pub confirmations: i64,
    /// Block size in bytes.
    #[serde(default)]
    pub size: usize,
    /// Block height.
    pub height: u32,
    /// Block time.
    pub time: i64,
    /// Previous block hash.
    #[serde(rename = "previousblockhash", default)]
    pub previous_block_hash: Option<String>,
    /// Next block hash.
    #[serde(rename = "nextblockhash", default)]
    pub next_block_hash: Option<String>,
    /// Full transaction objects.
    #[serde(default)]
    pub tx: Vec<serde_json::Value>,
}

impl GetBlockVerboseResponse {
    /// Converts the verbose block into a [`Block`], normalising every transaction.
    pub fn into_block(self, decimals: u32) -> Result<Block, ParseError> {
        let txs = self
            .tx
            .into_iter()
            .map(|tx| normalize_tx_value(tx, decimals))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Block {
            header: BlockHeaderInfo {
                hash: self.hash,
                prev: self.previous_block_hash.unwrap_or_default(),
                next: self.next_block_hash.unwrap_or_default(),
                height: self.height,
                confirmations: self.confirmations,
                size: self.size,
                time: self.time,
            },
            txs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blockchain_info_keeps_chain_name() {
        let info: GetBlockchainInfoResponse = serde_json::from_str(
            r#"{"chain": "test", "blocks": 41000, "headers": 41000,
                "bestblockhash": "00aa", "difficulty": 1.5, "moneysupply": 100}"#,
        )
        .unwrap();
        assert_eq!(info.chain, "test");
        assert_eq!(info.blocks, 41_000);
    }

    #[test]
    fn smart_fee_with_rate() {
        let fee: EstimateSmartFeeResponse =
            serde_json::from_str(r#"{"feerate": 0.00512, "blocks": 2}"#).unwrap();
        assert!(!fee.has_errors());
        assert_eq!(fee.fee_rate_units(8).unwrap(), Amount::from_units(512_000));
    }

    #[test]
    fn smart_fee_with_errors_and_no_rate() {
        let fee: EstimateSmartFeeResponse = serde_json::from_str(
            r#"{"errors": ["Insufficient data or no feerate found"], "blocks": 0}"#,
        )
        .unwrap();
        assert!(fee.has_errors());
        assert_eq!(fee.fee_rate_units(8).unwrap(), Amount::ZERO);
    }

    #[test]
    fn verbose_block_normalizes_transactions() {
        let block: GetBlockVerboseResponse = serde_json::from_str(
            r#"{
              "hash": "00bb", "confirmations": 1, "size": 300, "height": 50000,
              "time": 1700000123, "previousblockhash": "00aa",
              "tx": [
                {"txid": "01", "vout": [{"value": "2.00000000", "n": 0, "scriptPubKey": {"hex": "51"}}]},
                {"txid": "02", "vout": []}
              ]
            }"#,
        )
        .unwrap();
        let block = block.into_block(8).unwrap();
        assert_eq!(block.header.height, 50_000);
        assert_eq!(block.header.prev, "00aa");
        assert_eq!(block.header.next, "");
        assert_eq!(block.txs.len(), 2);
        assert_eq!(block.txs[0].vout[0].value_sat, Amount::from_units(200_000_000));
        assert!(block.txs[0].vout[0].script_pub_key.addresses.is_empty());
    }
}
