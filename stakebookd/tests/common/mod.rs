//! Shared node stand-in for the daemon tests.

use async_trait::async_trait;
use stakebook_fetch::jsonrpsee::response::{
    block_header::GetBlockHeaderResponse, EstimateSmartFeeResponse, GetBlockVerboseResponse,
    GetBlockchainInfoResponse,
};
use stakebook_state::{BlockchainSource, BlockchainSourceError, BlockchainSourceResult};

/// A node that only answers chain info and tip requests.
pub struct StubSource {
    pub chain: String,
    pub height: u32,
}

impl StubSource {
    pub fn new(chain: &str) -> Self {
        StubSource {
            chain: chain.to_string(),
            height: 41_000,
        }
    }
}

fn unsupported(call: &str) -> BlockchainSourceError {
    BlockchainSourceError::Unrecoverable(format!("{call} not supported by stub"))
}

#[async_trait]
impl BlockchainSource for StubSource {
    async fn get_chain_info(&self) -> BlockchainSourceResult<GetBlockchainInfoResponse> {
        serde_json::from_value(serde_json::json!({
            "chain": self.chain,
            "blocks": self.height,
        }))
        .map_err(|e| BlockchainSourceError::Unrecoverable(e.to_string()))
    }

    async fn get_best_block_height(&self) -> BlockchainSourceResult<u32> {
        Ok(self.height)
    }

    async fn get_block_hash(&self, _height: u32) -> BlockchainSourceResult<String> {
        Err(unsupported("getblockhash"))
    }

    async fn get_block_header(
        &self,
        _hash: &str,
    ) -> BlockchainSourceResult<GetBlockHeaderResponse> {
        Err(unsupported("getblockheader"))
    }

    async fn get_block_raw(&self, _hash: &str) -> BlockchainSourceResult<Vec<u8>> {
        Err(unsupported("getblock"))
    }

    async fn get_block_verbose(
        &self,
        _hash: &str,
    ) -> BlockchainSourceResult<GetBlockVerboseResponse> {
        Err(unsupported("getblock"))
    }

    async fn get_raw_transaction(&self, _txid: &str) -> BlockchainSourceResult<Vec<u8>> {
        Err(unsupported("getrawtransaction"))
    }

    async fn estimate_smart_fee(
        &self,
        _blocks: u32,
        _conservative: bool,
    ) -> BlockchainSourceResult<EstimateSmartFeeResponse> {
        Err(unsupported("estimatesmartfee"))
    }
}
