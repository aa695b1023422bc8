//! Common types and configurations shared across Stakebook crates.
//!
//! This crate provides chain parameters and the registry they are bound into,
//! together with the shared configuration types used across the Stakebook
//! decoding stack.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain_params;
pub mod config;

// Re-export commonly used types at crate root.
pub use chain_params::{
    default_registry, get_chain_params, ChainParams, ChainParamsError, ChainParamsRegistry,
    NetworkMagic, MAINNET_MAGIC, TESTNET_MAGIC,
};
pub use config::network::Network;
pub use config::parser::{ParserConfig, DEFAULT_AMOUNT_DECIMALS, DEFAULT_FORK_HEIGHT};
pub use config::service::{ServiceConfig, DEFAULT_MIN_FEE_RATE};
pub use config::validator::ValidatorConfig;

// Keep submodule access available for more specific imports if needed
pub use config::network;
pub use config::parser;
pub use config::service;
pub use config::validator;
