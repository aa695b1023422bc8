//! Holds error types for the block and transaction service.

use stakebook_common::ChainParamsError;
use stakebook_fetch::chain::error::ParseError;

use crate::source::BlockchainSourceError;

/// Errors related to the `StakeChainService`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Error from the block source.
    #[error("Block source error: {0}")]
    BlockchainSourceError(#[from] BlockchainSourceError),

    /// A fetched block could not be decoded.
    #[error("Error decoding block {height} {hash}: {source}")]
    BlockDecode {
        /// Height the block was requested at.
        height: u32,
        /// Hash the block was requested by.
        hash: String,
        /// Decoder error.
        source: ParseError,
    },

    /// A fetched transaction or RPC response could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    /// Chain parameters could not be selected.
    #[error("Chain parameter error: {0}")]
    ChainParamsError(#[from] ChainParamsError),
}
