//! Chain-agnostic block and transaction records handed to the indexing pipeline.

use serde::{Deserialize, Serialize};

use crate::jsonrpsee::response::common::amount::Amount;

/// Block header summary.
///
/// Height and hash are not carried by raw block bytes, they are filled in by the
/// caller that fetched the block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderInfo {
    /// Block hash as displayed by the node.
    pub hash: String,
    /// Previous block hash.
    #[serde(rename = "previousblockhash", default)]
    pub prev: String,
    /// Next block hash.
    #[serde(rename = "nextblockhash", default)]
    pub next: String,
    /// Block height.
    pub height: u32,
    /// Number of confirmations in the best chain.
    #[serde(default)]
    pub confirmations: i64,
    /// Size of the decoded payload in bytes.
    pub size: usize,
    /// Block timestamp, seconds since the Unix epoch.
    pub time: i64,
}

/// A decoded block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Header summary.
    #[serde(flatten)]
    pub header: BlockHeaderInfo,
    /// Transactions in block order.
    pub txs: Vec<Tx>,
}

/// Unlocking script of an input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSig {
    /// Script bytes, hex encoded.
    pub hex: String,
}

/// Transaction input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vin {
    /// Coinbase script, hex encoded. Empty for regular inputs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub coinbase: String,
    /// Spent transaction id. Empty for coinbase inputs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub txid: String,
    /// Spent output index.
    #[serde(default)]
    pub vout: u32,
    /// Unlocking script.
    #[serde(rename = "scriptSig", default)]
    pub script_sig: ScriptSig,
    /// Sequence number.
    pub sequence: u32,
    /// Addresses of the spent output, when known.
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// Locking script of an output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKey {
    /// Script bytes, hex encoded.
    pub hex: String,
    /// Destination addresses. Always present, possibly empty.
    pub addresses: Vec<String>,
}

/// Transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vout {
    /// Value in smallest units.
    #[serde(rename = "valueSat")]
    pub value_sat: Amount,
    /// Output index.
    pub n: u32,
    /// Locking script.
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

/// A chain-agnostic transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Raw transaction, hex encoded.
    pub hex: String,
    /// Transaction id as displayed by the node.
    pub txid: String,
    /// Transaction version.
    pub version: i32,
    /// Lock time.
    #[serde(rename = "locktime")]
    pub lock_time: u32,
    /// Inputs.
    pub vin: Vec<Vin>,
    /// Outputs.
    pub vout: Vec<Vout>,
    /// Hash of the containing block, empty for mempool transactions.
    #[serde(rename = "blockhash", default)]
    pub block_hash: String,
    /// Confirmations, zero for mempool transactions.
    #[serde(default)]
    pub confirmations: u32,
    /// Transaction time.
    #[serde(default)]
    pub time: i64,
    /// Time of the containing block.
    #[serde(rename = "blocktime", default)]
    pub block_time: i64,
}
