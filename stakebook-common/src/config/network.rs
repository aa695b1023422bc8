//! Network type for Stakebook configuration.

/// Network type for Stakebook configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet network
    #[default]
    Mainnet,
    /// Testnet network
    Testnet,
}

impl Network {
    /// Selects a network from the chain name reported by the node's `getblockchaininfo`.
    ///
    /// Only `"test"` selects [`Network::Testnet`], every other name (including an empty
    /// or unknown one) falls back to [`Network::Mainnet`].
    pub fn from_chain_name(chain: &str) -> Self {
        match chain {
            "test" => Network::Testnet,
            _ => Network::Mainnet,
        }
    }

    /// Returns true for the test network.
    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Testnet)
    }

    /// Network label handed to consumers of the indexer's `getInfo` style requests.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Mainnet => "livenet",
            Network::Testnet => "testnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}
