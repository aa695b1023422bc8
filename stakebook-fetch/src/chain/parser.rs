//! Block parsers.
//!
//! [`BitcoinParser`] decodes the plain Bitcoin wire layout. [`StakeParser`] wraps it
//! and switches to the extended header layout from the fork height onwards.

use stakebook_common::{ChainParams, ParserConfig};
use tracing::{debug, trace};

use crate::{
    chain::{
        block::{parse_transactions, BlockHeader, HeightPrefixedPayload, StakeBlockHeader},
        error::ParseError,
        transaction::FullTransaction,
        types::{Block, BlockHeaderInfo, ScriptPubKey, ScriptSig, Tx, Vin, Vout},
        utils::{display_hash, ParseFromSlice},
    },
    jsonrpsee::response::{
        common::amount::Amount,
        transaction::{normalize_tx, GetRawTransactionResponse, ScriptPubKeyResponse},
    },
};

/// Decodes the blocks and transactions of one chain.
pub trait ChainParser: Send + Sync {
    /// Chain parameters the parser was built for.
    fn params(&self) -> &ChainParams;

    /// Number of fractional digits of one coin.
    fn amount_decimals(&self) -> u32;

    /// Parses a block header, returning the unread bytes.
    fn parse_header<'a>(&self, data: &'a [u8]) -> Result<(&'a [u8], BlockHeader), ParseError>;

    /// Parses a block as handed over by the block source.
    fn parse_block(&self, data: &[u8]) -> Result<Block, ParseError>;

    /// Parses a verbose `getrawtransaction` object.
    fn parse_tx_from_json(&self, raw: &[u8]) -> Result<Tx, ParseError>;

    /// Converts a decimal coin amount into smallest units.
    fn amount_to_big_int(&self, amount: &str) -> Result<Amount, ParseError> {
        Amount::from_decimal_str(amount, self.amount_decimals())
    }

    /// Converts a wire transaction into a [`Tx`]. Addresses are never derived.
    fn tx_from_full_transaction(&self, tx: &FullTransaction) -> Tx;
}

/// Parser for the plain Bitcoin wire layout.
#[derive(Debug, Clone)]
pub struct BitcoinParser {
    params: ChainParams,
    amount_decimals: u32,
}

impl BitcoinParser {
    /// Returns a parser for `params` with `amount_decimals` fractional digits.
    pub fn new(params: ChainParams, amount_decimals: u32) -> Self {
        BitcoinParser {
            params,
            amount_decimals,
        }
    }
}

impl ChainParser for BitcoinParser {
    fn params(&self) -> &ChainParams {
        &self.params
    }

    fn amount_decimals(&self) -> u32 {
        self.amount_decimals
    }

    fn parse_header<'a>(&self, data: &'a [u8]) -> Result<(&'a [u8], BlockHeader), ParseError> {
        BlockHeader::parse_from_slice(data)
    }

    fn parse_block(&self, data: &[u8]) -> Result<Block, ParseError> {
        let (remaining, header) = self.parse_header(data)?;
        let txs = parse_transactions(remaining)?
            .iter()
            .map(|tx| self.tx_from_full_transaction(tx))
            .collect();

        Ok(Block {
            header: BlockHeaderInfo {
                size: data.len(),
                time: header.time(),
                ..Default::default()
            },
            txs,
        })
    }

    fn parse_tx_from_json(&self, raw: &[u8]) -> Result<Tx, ParseError> {
        let response: GetRawTransactionResponse = serde_json::from_slice(raw)?;
        response.into_tx(self.amount_decimals, ScriptPubKeyResponse::into_any_addresses)
    }

    fn tx_from_full_transaction(&self, tx: &FullTransaction) -> Tx {
        let vin = if tx.is_coinbase() {
            tx.inputs()
                .iter()
                .take(1)
                .map(|input| Vin {
                    coinbase: hex::encode(input.script_sig()),
                    sequence: input.sequence(),
                    ..Default::default()
                })
                .collect()
        } else {
            tx.inputs()
                .iter()
                .map(|input| Vin {
                    txid: display_hash(input.prev_txid()),
                    vout: input.prev_index(),
                    script_sig: ScriptSig {
                        hex: hex::encode(input.script_sig()),
                    },
                    sequence: input.sequence(),
                    ..Default::default()
                })
                .collect()
        };

        let vout = tx
            .outputs()
            .iter()
            .enumerate()
            .map(|(n, output)| Vout {
                value_sat: Amount::from_units(output.value()),
                n: n as u32,
                script_pub_key: ScriptPubKey {
                    hex: hex::encode(output.script_pub_key()),
                    addresses: Vec::new(),
                },
            })
            .collect();

        Tx {
            hex: hex::encode(tx.raw_bytes()),
            txid: tx.txid(),
            version: tx.version(),
            lock_time: tx.lock_time(),
            vin,
            vout,
            ..Default::default()
        }
    }
}

/// Parser for the proof-of-stake chain.
///
/// Blocks below `fork_height` are plain Bitcoin blocks and go to the base parser
/// untouched. From `fork_height` onwards headers carry the stake fields and a block
/// signature.
#[derive(Debug, Clone)]
pub struct StakeParser {
    base: BitcoinParser,
    fork_height: u32,
}

impl StakeParser {
    /// Returns a parser for `params` configured by `config`.
    pub fn new(params: ChainParams, config: &ParserConfig) -> Self {
        StakeParser {
            base: BitcoinParser::new(params, config.amount_decimals),
            fork_height: config.fork_height,
        }
    }

    /// Returns the base parser.
    pub fn base(&self) -> &BitcoinParser {
        &self.base
    }

    /// First height with extended headers.
    pub fn fork_height(&self) -> u32 {
        self.fork_height
    }
}

impl ChainParser for StakeParser {
    fn params(&self) -> &ChainParams {
        self.base.params()
    }

    fn amount_decimals(&self) -> u32 {
        self.base.amount_decimals()
    }

    fn parse_header<'a>(&self, data: &'a [u8]) -> Result<(&'a [u8], BlockHeader), ParseError> {
        let (remaining, header) = StakeBlockHeader::parse_from_slice(data)?;
        Ok((remaining, header.into_header()))
    }

    /// Parses a [`HeightPrefixedPayload`].
    ///
    /// The returned header has no height or hash, and its size is the length of the
    /// whole payload.
    fn parse_block(&self, data: &[u8]) -> Result<Block, ParseError> {
        let payload = HeightPrefixedPayload::decode(data)?;

        if payload.height() < self.fork_height {
            debug!(height = payload.height(), "decoding legacy block");
            return self.base.parse_block(payload.block());
        }

        let (remaining, header) = StakeBlockHeader::parse_from_slice(payload.block())?;
        trace!(
            height = payload.height(),
            header_len = header.encoded_len(),
            "decoded extended header"
        );
        let txs: Vec<Tx> = parse_transactions(remaining)?
            .iter()
            .map(|tx| self.tx_from_full_transaction(tx))
            .collect();
        debug!(
            height = payload.height(),
            txs = txs.len(),
            "decoded extended block"
        );

        Ok(Block {
            header: BlockHeaderInfo {
                size: payload.payload_len(),
                time: header.header().time(),
                ..Default::default()
            },
            txs,
        })
    }

    fn parse_tx_from_json(&self, raw: &[u8]) -> Result<Tx, ParseError> {
        normalize_tx(raw, self.amount_decimals())
    }

    fn tx_from_full_transaction(&self, tx: &FullTransaction) -> Tx {
        self.base.tx_from_full_transaction(tx)
    }
}
