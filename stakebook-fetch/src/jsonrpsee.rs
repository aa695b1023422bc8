//! JsonRPC response types served by the node, and their conversion into decoded records.

pub mod response;
