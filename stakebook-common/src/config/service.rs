//! Service-level configuration shared across Stakebook services.

/// Minimum fee rate returned by fee estimation, in smallest units per kilobyte.
pub const DEFAULT_MIN_FEE_RATE: u64 = 400_000;

/// Service-level configuration for block fetching and fee estimation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Decode raw blocks locally. When false, blocks are fetched as verbose JSON.
    pub parse_blocks: bool,
    /// Floor applied to smart fee estimates that come back with errors.
    pub min_fee_rate: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            parse_blocks: true,
            min_fee_rate: DEFAULT_MIN_FEE_RATE,
        }
    }
}
