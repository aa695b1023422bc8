//! BlockchainSource is the connection the service holds to the serving node.

use async_trait::async_trait;
use stakebook_fetch::jsonrpsee::response::{
    block_header::GetBlockHeaderResponse, EstimateSmartFeeResponse, GetBlockVerboseResponse,
    GetBlockchainInfoResponse,
};

/// A trait for accessing blockchain data from the node.
///
/// Transport, authentication and retries are the implementor's concern.
#[async_trait]
pub trait BlockchainSource: Send + Sync + 'static {
    /// Returns the node's `getblockchaininfo` response.
    async fn get_chain_info(&self) -> BlockchainSourceResult<GetBlockchainInfoResponse>;

    /// Returns the height of the best block.
    async fn get_best_block_height(&self) -> BlockchainSourceResult<u32>;

    /// Returns the hash of the best-chain block at `height`.
    async fn get_block_hash(&self, height: u32) -> BlockchainSourceResult<String>;

    /// Returns the verbose header of the block `hash`.
    async fn get_block_header(&self, hash: &str) -> BlockchainSourceResult<GetBlockHeaderResponse>;

    /// Returns the raw serialized block `hash`.
    async fn get_block_raw(&self, hash: &str) -> BlockchainSourceResult<Vec<u8>>;

    /// Returns the block `hash` with full transaction objects.
    async fn get_block_verbose(&self, hash: &str)
        -> BlockchainSourceResult<GetBlockVerboseResponse>;

    /// Returns the verbose `getrawtransaction` object of `txid` as raw JSON.
    async fn get_raw_transaction(&self, txid: &str) -> BlockchainSourceResult<Vec<u8>>;

    /// Returns the node's fee estimate for confirmation within `blocks`.
    async fn estimate_smart_fee(
        &self,
        blocks: u32,
        conservative: bool,
    ) -> BlockchainSourceResult<EstimateSmartFeeResponse>;
}

/// An error originating from a blockchain source.
#[derive(Debug, thiserror::Error)]
pub enum BlockchainSourceError {
    /// The requested block or transaction is unknown to the node.
    #[error("not found: {0}")]
    NotFound(String),

    /// TODO: Split out recoverable errors (connection resets, work queue full) once
    /// the transport retries them.
    #[error("critical error in backing block source: {0}")]
    Unrecoverable(String),
}

/// Result type of [`BlockchainSource`] calls.
pub type BlockchainSourceResult<T> = Result<T, BlockchainSourceError>;
