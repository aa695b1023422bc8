//! Block and transaction decoding for a proof-of-stake chain derived from the Bitcoin protocol.
//!
//! [`chain`] holds the wire decoders: the plain Bitcoin layout used before the stake
//! fork, and the extended header layout used after it. [`jsonrpsee`] holds the JsonRPC
//! response types served by the node, and the normalisation of its transaction objects.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod jsonrpsee;
