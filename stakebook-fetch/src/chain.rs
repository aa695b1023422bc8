//! Wire decoding of blocks and transactions.

pub mod block;
pub mod error;
pub mod parser;
pub mod transaction;
pub mod types;
pub mod utils;
