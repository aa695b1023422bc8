//! Chain parameters and the registry they are bound into.
//!
//! Every network is identified on the wire by a 4-byte magic value. A
//! [`ChainParamsRegistry`] binds each magic to exactly one parameter set, so that
//! two differently configured chains can never silently share a magic.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::config::network::Network;

/// Network magic, the first 4 bytes of every p2p message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct NetworkMagic(pub u32);

impl std::fmt::Display for NetworkMagic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Main network magic.
pub const MAINNET_MAGIC: NetworkMagic = NetworkMagic(0xf9be_b4d9);

/// Test network magic.
pub const TESTNET_MAGIC: NetworkMagic = NetworkMagic(0x0b11_0907);

/// Network parameters for the chain.
///
/// Address encoding parameters are inherited from the Bitcoin networks the chain
/// was forked from and are left at those values.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ChainParams {
    /// Human readable network name.
    pub name: String,
    /// Network magic.
    pub net: NetworkMagic,
    /// Network the parameters describe.
    pub network: Network,
    /// Version byte of pay-to-pubkey-hash addresses.
    pub pubkey_hash_addr_id: u8,
    /// Version byte of pay-to-script-hash addresses.
    pub script_hash_addr_id: u8,
    /// Human readable part of segwit addresses.
    pub bech32_hrp_segwit: String,
}

impl ChainParams {
    /// Main network parameters.
    pub fn mainnet() -> Self {
        ChainParams {
            name: "mainnet".to_string(),
            net: MAINNET_MAGIC,
            network: Network::Mainnet,
            pubkey_hash_addr_id: 0x00,
            script_hash_addr_id: 0x05,
            bech32_hrp_segwit: "bc".to_string(),
        }
    }

    /// Test network parameters.
    pub fn testnet() -> Self {
        ChainParams {
            name: "testnet3".to_string(),
            net: TESTNET_MAGIC,
            network: Network::Testnet,
            pubkey_hash_addr_id: 0x6f,
            script_hash_addr_id: 0xc4,
            bech32_hrp_segwit: "tb".to_string(),
        }
    }

    /// Parameters for the given network.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => ChainParams::mainnet(),
            Network::Testnet => ChainParams::testnet(),
        }
    }
}

/// Chain parameter registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainParamsError {
    /// The magic is already bound to a different parameter set.
    ///
    /// Continuing would misinterpret network data, callers must halt startup.
    #[error("network magic {magic} is already registered to '{registered}', cannot register '{attempted}'")]
    RegistrationConflict {
        /// Magic both parameter sets claim.
        magic: NetworkMagic,
        /// Name of the parameter set that holds the magic.
        registered: String,
        /// Name of the parameter set that was refused.
        attempted: String,
    },

    /// The registry lock was poisoned by a panicking thread.
    #[error("chain parameter registry is poisoned")]
    Poisoned,
}

/// Registry binding network magics to chain parameters.
///
/// The registry is an explicit store owned by the caller; [`get_chain_params`] wraps a
/// process-wide instance for callers without one. All access is serialized through an
/// internal mutex, so concurrent first-time initialisation registers each set once.
#[derive(Debug, Default)]
pub struct ChainParamsRegistry {
    registered: Mutex<HashMap<NetworkMagic, ChainParams>>,
}

impl ChainParamsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `params` to its magic.
    ///
    /// Registering an identical parameter set again is a no-op.
    pub fn register(&self, params: &ChainParams) -> Result<(), ChainParamsError> {
        let mut registered = self
            .registered
            .lock()
            .map_err(|_| ChainParamsError::Poisoned)?;
        if !is_bound(&registered, params)? {
            registered.insert(params.net, params.clone());
        }
        Ok(())
    }

    /// Returns true if `params.net` is bound in this registry.
    pub fn is_registered(&self, params: &ChainParams) -> bool {
        self.registered
            .lock()
            .map(|registered| registered.contains_key(&params.net))
            .unwrap_or(false)
    }

    /// Returns the parameters for the chain name reported by the node.
    ///
    /// The first call registers the main and test parameter sets, unless main is already
    /// registered, in which case registration is skipped entirely. Both sets are checked
    /// before either is bound, so a conflict leaves the registry untouched.
    /// `"test"` selects the test network; any other name selects main.
    pub fn get_chain_params(&self, chain: &str) -> Result<ChainParams, ChainParamsError> {
        let mainnet = ChainParams::mainnet();
        {
            let mut registered = self
                .registered
                .lock()
                .map_err(|_| ChainParamsError::Poisoned)?;
            if !registered.contains_key(&mainnet.net) {
                let testnet = ChainParams::testnet();
                let testnet_bound = is_bound(&registered, &testnet)?;
                registered.insert(mainnet.net, mainnet);
                if !testnet_bound {
                    registered.insert(testnet.net, testnet);
                }
                info!("Registered chain parameters for mainnet and testnet.");
            }
        }

        Ok(ChainParams::for_network(Network::from_chain_name(chain)))
    }
}

/// Returns true if `params` is already bound, or a conflict if its magic holds another set.
fn is_bound(
    registered: &HashMap<NetworkMagic, ChainParams>,
    params: &ChainParams,
) -> Result<bool, ChainParamsError> {
    match registered.get(&params.net) {
        Some(existing) if existing == params => {
            debug!("Chain parameters '{}' already registered.", params.name);
            Ok(true)
        }
        Some(existing) => Err(ChainParamsError::RegistrationConflict {
            magic: params.net,
            registered: existing.name.clone(),
            attempted: params.name.clone(),
        }),
        None => Ok(false),
    }
}

static DEFAULT_REGISTRY: Lazy<ChainParamsRegistry> = Lazy::new(ChainParamsRegistry::new);

/// Returns the process-wide default registry.
pub fn default_registry() -> &'static ChainParamsRegistry {
    &DEFAULT_REGISTRY
}

/// [`ChainParamsRegistry::get_chain_params`] on the process-wide default registry.
pub fn get_chain_params(chain: &str) -> Result<ChainParams, ChainParamsError> {
    DEFAULT_REGISTRY.get_chain_params(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn selects_test_params_only_for_test() {
        let registry = ChainParamsRegistry::new();
        assert_eq!(
            registry.get_chain_params("test").unwrap().net,
            TESTNET_MAGIC
        );
        assert_eq!(
            registry.get_chain_params("main").unwrap().net,
            MAINNET_MAGIC
        );
        assert_eq!(registry.get_chain_params("").unwrap().net, MAINNET_MAGIC);
        assert_eq!(
            registry.get_chain_params("unknown").unwrap().name,
            "mainnet"
        );
    }

    #[test]
    fn first_lookup_registers_both_networks() {
        let registry = ChainParamsRegistry::new();
        assert!(!registry.is_registered(&ChainParams::mainnet()));
        registry.get_chain_params("main").unwrap();
        assert!(registry.is_registered(&ChainParams::mainnet()));
        assert!(registry.is_registered(&ChainParams::testnet()));
    }

    #[test]
    fn identical_registration_is_idempotent() {
        let registry = ChainParamsRegistry::new();
        registry.register(&ChainParams::mainnet()).unwrap();
        registry.register(&ChainParams::mainnet()).unwrap();
        registry.get_chain_params("main").unwrap();
        registry.get_chain_params("test").unwrap();
    }

    #[test]
    fn conflicting_magic_is_refused() {
        let registry = ChainParamsRegistry::new();
        registry.register(&ChainParams::mainnet()).unwrap();

        let mut impostor = ChainParams::testnet();
        impostor.net = MAINNET_MAGIC;
        let err = registry.register(&impostor).unwrap_err();
        assert_eq!(
            err,
            ChainParamsError::RegistrationConflict {
                magic: MAINNET_MAGIC,
                registered: "mainnet".to_string(),
                attempted: "testnet3".to_string(),
            }
        );
    }

    #[test]
    fn conflicting_testnet_fails_initialisation() {
        let registry = ChainParamsRegistry::new();
        let mut squatter = ChainParams::mainnet();
        squatter.name = "squatter".to_string();
        squatter.net = TESTNET_MAGIC;
        registry.register(&squatter).unwrap();

        let err = registry.get_chain_params("test").unwrap_err();
        assert!(matches!(
            err,
            ChainParamsError::RegistrationConflict { magic, .. } if magic == TESTNET_MAGIC
        ));
    }

    #[test]
    fn failed_initialisation_leaves_registry_untouched() {
        let registry = ChainParamsRegistry::new();
        let mut squatter = ChainParams::mainnet();
        squatter.name = "squatter".to_string();
        squatter.net = TESTNET_MAGIC;
        registry.register(&squatter).unwrap();

        for chain in ["test", "test", "main"] {
            assert!(matches!(
                registry.get_chain_params(chain),
                Err(ChainParamsError::RegistrationConflict { magic, .. }) if magic == TESTNET_MAGIC
            ));
        }
        assert!(!registry.is_registered(&ChainParams::mainnet()));
        assert_eq!(registry.registered.lock().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_initialisation_registers_once() {
        let registry = Arc::new(ChainParamsRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let chain = if i % 2 == 0 { "main" } else { "test" };
                    registry.get_chain_params(chain)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(registry.registered.lock().unwrap().len(), 2);
    }

    #[test]
    fn default_registry_is_shared() {
        let a = get_chain_params("test").unwrap();
        let b = default_registry().get_chain_params("test").unwrap();
        assert_eq!(a, b);
        assert!(default_registry().is_registered(&ChainParams::testnet()));
    }
}
