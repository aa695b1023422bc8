//! Stakebook's block and transaction service.
//!
//! [`StakeChainService`] answers block and transaction requests for the indexing
//! pipeline. It fetches data through a [`BlockchainSource`], the node connection, and
//! decodes it with the chain's [`stakebook_fetch::chain::parser::StakeParser`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod source;

pub use source::{BlockchainSource, BlockchainSourceError, BlockchainSourceResult};

pub(crate) mod error;

pub use error::ServiceError;

pub(crate) mod service;

pub use service::StakeChainService;
