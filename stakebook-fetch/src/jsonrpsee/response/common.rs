//! Common types used across jsonRPC responses.

pub mod amount;
