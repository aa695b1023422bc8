//! Stakebook daemon library.
//!
//! Loads the layered configuration and starts the block and transaction service.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod indexer;
