//! Types associated with the `getblockheader` RPC request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chain::types::BlockHeaderInfo;

/// Verbose response to a `getblockheader` RPC request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetBlockHeaderResponse {
    /// The hash of the requested block.
    pub hash: String,

    /// The number of confirmations of this block in the best chain,
    /// or -1 if it is not in the best chain.
    pub confirmations: i64,

    /// The height of the requested block.
    pub height: u32,

    /// The version field of the requested block.
    pub version: i32,

    /// The merkle root of the requested block.
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,

    /// The block time of the requested block header in non-leap seconds since Jan 1 1970 GMT.
    pub time: i64,

    /// The nonce of the requested block header.
    pub nonce: u32,

    /// The difficulty threshold of the requested block header displayed in compact form.
    pub bits: String,

    /// The previous block hash of the requested block header.
    #[serde(
        rename = "previousblockhash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_block_hash: Option<String>,

    /// The next block hash after the requested block header.
    #[serde(
        rename = "nextblockhash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_block_hash: Option<String>,

    /// Catch-all for stake fields (`hashStateRoot`, `prevoutStakeHash`, ...) and any
    /// other undocumented fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl From<GetBlockHeaderResponse> for BlockHeaderInfo {
    fn from(header: GetBlockHeaderResponse) -> Self {
        BlockHeaderInfo {
            hash: header.hash,
            prev: header.previous_block_hash.unwrap_or_default(),
            next: header.next_block_hash.unwrap_or_default(),
            height: header.height,
            confirmations: header.confirmations,
            // Not reported by `getblockheader`.
            size: 0,
            time: header.time,
        }
    }
}
