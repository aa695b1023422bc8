//! Validator type for Stakebook configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Full node / validator configuration.
///
/// Stakebook does not own the connection to the node. These settings are checked at
/// startup and handed to whichever transport backs the block source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ValidatorConfig {
    /// Full node / validator JsonRPC listen address.
    pub validator_jsonrpc_listen_address: SocketAddr,
    /// Path to the validator cookie file. Enable validator rpc cookie authentication with Some.
    pub validator_cookie_path: Option<PathBuf>,
}
