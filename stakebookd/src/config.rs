//! Stakebook config.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};
use tracing::{error, info};

use stakebook_common::{Network, ParserConfig, ServiceConfig, ValidatorConfig};

use crate::error::IndexerError;

/// Highest supported number of fractional amount digits.
pub const MAX_AMOUNT_DECIMALS: u32 = 18;

/// Default port of the node's JsonRPC interface.
pub const DEFAULT_VALIDATOR_RPC_PORT: u16 = 3889;

/// Config information required for Stakebook.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StakebookdConfig {
    /// Network the node is expected to serve.
    pub network: Network,
    /// Full node / validator configuration settings.
    pub validator_settings: ValidatorConfig,
    /// Block and transaction decoding settings.
    pub parser: ParserConfig,
    /// Service-level configuration (block parsing, fee floor).
    pub service: ServiceConfig,
}

impl StakebookdConfig {
    /// Performs checks on config data.
    pub(crate) fn check_config(&self) -> Result<(), IndexerError> {
        // Check validator cookie authentication settings
        if let Some(ref cookie_path) = self.validator_settings.validator_cookie_path {
            if !std::path::Path::new(cookie_path).exists() {
                return Err(IndexerError::ConfigError(format!(
                    "Validator cookie authentication is enabled, but cookie path '{:?}' does not exist.",
                    cookie_path
                )));
            }
        }

        let validator_addr = self.validator_settings.validator_jsonrpc_listen_address;

        // Ensure validator listen address is private.
        if !is_private_listen_addr(&validator_addr) {
            return Err(IndexerError::ConfigError(
                "Stakebook may only connect to a node with private IP addresses.".to_string(),
            ));
        }

        // Ensure validator rpc cookie authentication is used when connecting to non-loopback addresses.
        if !is_loopback_listen_addr(&validator_addr)
            && self.validator_settings.validator_cookie_path.is_none()
        {
            return Err(IndexerError::ConfigError(
                "Validator listen address is not loopback, so cookie authentication must be enabled."
                    .to_string(),
            ));
        }

        if self.parser.amount_decimals > MAX_AMOUNT_DECIMALS {
            return Err(IndexerError::ConfigError(format!(
                "parser.amount_decimals must be at most {MAX_AMOUNT_DECIMALS}, got {}.",
                self.parser.amount_decimals
            )));
        }

        Ok(())
    }

    /// Returns the network the node is expected to serve.
    pub fn get_network(&self) -> Network {
        self.network
    }
}

impl Default for StakebookdConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            validator_settings: ValidatorConfig {
                validator_jsonrpc_listen_address: SocketAddr::new(
                    IpAddr::V4(Ipv4Addr::LOCALHOST),
                    DEFAULT_VALIDATOR_RPC_PORT,
                ),
                validator_cookie_path: None,
            },
            parser: ParserConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

/// Returns true if `addr` is an RFC1918 (private) or loopback IPv4 address, or an IPv6
/// Unique Local or loopback address.
pub(crate) fn is_private_listen_addr(addr: &SocketAddr) -> bool {
    let ip = addr.ip();
    match ip {
        IpAddr::V4(ipv4) => ipv4.is_private() || ipv4.is_loopback(),
        IpAddr::V6(ipv6) => ipv6.is_unique_local() || ip.is_loopback(),
    }
}

/// Returns true if `addr` is a loopback address.
pub(crate) fn is_loopback_listen_addr(addr: &SocketAddr) -> bool {
    let ip = addr.ip();
    match ip {
        IpAddr::V4(ipv4) => ipv4.is_loopback(),
        IpAddr::V6(ipv6) => ipv6.is_loopback(),
    }
}

/// Attempts to load config data from a TOML file at the specified path.
///
/// A missing file leaves the defaults in place. Values are then overridden by
/// environment variables prefixed with `STAKEBOOK_`, nested keys separated by `__`
/// (`STAKEBOOK_PARSER__FORK_HEIGHT`). The result is validated before it is returned.
pub fn load_config(file_path: &PathBuf) -> Result<StakebookdConfig, IndexerError> {
    // Configuration sources are layered: Env > TOML > Defaults.
    let figment = Figment::new()
        // 1. Base defaults from `StakebookdConfig::default()`.
        .merge(Serialized::defaults(StakebookdConfig::default()))
        // 2. Override with values from the TOML configuration file.
        .merge(Toml::file(file_path))
        // 3. Override with values from environment variables prefixed with "STAKEBOOK_".
        .merge(Env::prefixed("STAKEBOOK_").split("__"));

    match figment.extract::<StakebookdConfig>() {
        Ok(parsed_config) => {
            parsed_config.check_config()?;
            info!(
                "Successfully loaded and validated config. Base TOML file checked: '{}'",
                file_path.display()
            );
            Ok(parsed_config)
        }
        Err(figment_error) => {
            error!(
                "Failed to extract configuration using figment: {}",
                figment_error
            );
            Err(IndexerError::ConfigError(format!(
                "Stakebook configuration loading failed during figment extract '{}' (could be TOML file or environment variables). Details: {}",
                file_path.display(), figment_error
            )))
        }
    }
}
