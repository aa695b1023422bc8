//! Block and transaction service backed by the node's JsonRPC interface.

use stakebook_common::{
    ChainParams, ChainParamsRegistry, Network, ParserConfig, ServiceConfig, MAINNET_MAGIC,
};
use stakebook_fetch::{
    chain::{
        block::HeightPrefixedPayload,
        parser::{ChainParser, StakeParser},
        types::{Block, BlockHeaderInfo, Tx},
    },
    jsonrpsee::response::common::amount::Amount,
};
use tracing::{debug, info, warn};

use crate::{error::ServiceError, source::BlockchainSource};

/// Block and transaction service for the proof-of-stake chain.
///
/// Blocks are fetched raw and decoded locally unless `parse_blocks` is disabled, in
/// which case the node's verbose block is used.
#[derive(Debug)]
pub struct StakeChainService<S> {
    /// Node connection.
    source: S,

    /// Parser for the chain the node serves.
    parser: StakeParser,

    /// Network the node serves.
    network: Network,

    /// Service config data.
    config: ServiceConfig,
}

impl<S: BlockchainSource> StakeChainService<S> {
    /// Initializes a new service for the chain `source` serves.
    ///
    /// Chain parameters are selected from `registry` by the chain name the node reports.
    pub async fn initialise(
        source: S,
        registry: &ChainParamsRegistry,
        config: ServiceConfig,
        parser_config: ParserConfig,
    ) -> Result<Self, ServiceError> {
        let chain_info = source.get_chain_info().await?;
        let params = registry.get_chain_params(&chain_info.chain)?;

        let network = if params.net == MAINNET_MAGIC {
            Network::Mainnet
        } else {
            Network::Testnet
        };
        info!("Block chain: {}", params.name);

        Ok(StakeChainService {
            source,
            parser: StakeParser::new(params, &parser_config),
            network,
            config,
        })
    }

    /// Returns the network label, `livenet` or `testnet`.
    pub fn network(&self) -> &'static str {
        self.network.label()
    }

    /// Returns true when the node serves the test network.
    pub fn is_testnet(&self) -> bool {
        self.network.is_testnet()
    }

    /// Returns the selected chain parameters.
    pub fn params(&self) -> &ChainParams {
        self.parser.params()
    }

    /// Returns the block parser.
    pub fn parser(&self) -> &StakeParser {
        &self.parser
    }

    /// Returns the node connection.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the height of the best block.
    pub async fn get_best_block_height(&self) -> Result<u32, ServiceError> {
        Ok(self.source.get_best_block_height().await?)
    }

    /// Returns the hash of the best-chain block at `height`.
    pub async fn get_block_hash(&self, height: u32) -> Result<String, ServiceError> {
        Ok(self.source.get_block_hash(height).await?)
    }

    /// Fetches and decodes the block `hash`, known to be at `height`.
    ///
    /// Skips the header request: the returned header carries only the hash, height,
    /// size and time. Previous and next hashes are left empty.
    pub async fn get_block_without_header(
        &self,
        hash: &str,
        height: u32,
    ) -> Result<Block, ServiceError> {
        let mut block = self.fetch_and_parse(hash, height).await?;
        block.header.hash = hash.to_string();
        block.header.height = height;
        Ok(block)
    }

    /// Returns the block `hash`, or the best-chain block at `height` when `hash` is empty.
    pub async fn get_block(&self, hash: &str, height: u32) -> Result<Block, ServiceError> {
        let hash = if hash.is_empty() {
            self.source.get_block_hash(height).await?
        } else {
            hash.to_string()
        };

        if !self.config.parse_blocks {
            return self.get_block_full(&hash).await;
        }
        if height > 0 {
            return self.get_block_without_header(&hash, height).await;
        }

        let header: BlockHeaderInfo = self.source.get_block_header(&hash).await?.into();
        let block = self.fetch_and_parse(&hash, header.height).await?;
        Ok(Block {
            header: BlockHeaderInfo {
                size: block.header.size,
                ..header
            },
            txs: block.txs,
        })
    }

    /// Returns the node's verbose block `hash`, with every transaction normalised.
    pub async fn get_block_full(&self, hash: &str) -> Result<Block, ServiceError> {
        let verbose = self.source.get_block_verbose(hash).await?;
        debug!(hash, txs = verbose.tx.len(), "normalising verbose block");
        Ok(verbose.into_block(self.parser.amount_decimals())?)
    }

    /// Returns the transaction `txid`.
    pub async fn get_transaction(&self, txid: &str) -> Result<Tx, ServiceError> {
        let raw = self.source.get_raw_transaction(txid).await?;
        Ok(self.parser.parse_tx_from_json(&raw)?)
    }

    /// Returns the mempool transaction `txid`.
    ///
    /// Same request as [`StakeChainService::get_transaction`]; the block fields are
    /// empty for unconfirmed transactions.
    pub async fn get_transaction_for_mempool(&self, txid: &str) -> Result<Tx, ServiceError> {
        self.get_transaction(txid).await
    }

    /// Returns the estimated fee rate in smallest units per kilobyte.
    ///
    /// When the node reports errors and its rate is below the configured minimum, the
    /// minimum is returned instead. Source failures are not masked.
    pub async fn estimate_smart_fee(
        &self,
        blocks: u32,
        conservative: bool,
    ) -> Result<Amount, ServiceError> {
        let estimate = self.source.estimate_smart_fee(blocks, conservative).await?;
        let fee_rate = match estimate.fee_rate_units(self.parser.amount_decimals()) {
            Ok(rate) => rate,
            // A failed estimate may carry a sentinel rate such as -1.
            Err(e) if estimate.has_errors() => {
                debug!(blocks, "Discarding unusable fee rate from failed estimate: {e}");
                Amount::ZERO
            }
            Err(e) => return Err(e.into()),
        };
        let min_fee_rate = Amount::from_units(self.config.min_fee_rate);

        if estimate.has_errors() && fee_rate < min_fee_rate {
            warn!(
                blocks,
                errors = ?estimate.errors,
                "Fee estimate failed, using minimum fee rate {min_fee_rate}."
            );
            return Ok(min_fee_rate);
        }
        Ok(fee_rate)
    }

    async fn fetch_and_parse(&self, hash: &str, height: u32) -> Result<Block, ServiceError> {
        let raw = self.source.get_block_raw(hash).await?;
        let payload = HeightPrefixedPayload::encode(height, &raw);
        self.parser
            .parse_block(&payload)
            .map_err(|source| ServiceError::BlockDecode {
                height,
                hash: hash.to_string(),
                source,
            })
    }
}
