//! Block and transaction parser configuration.

/// Number of fractional digits in a decimal coin amount (coins to smallest unit).
pub const DEFAULT_AMOUNT_DECIMALS: u32 = 8;

/// Height from which blocks carry the proof-of-stake header extension.
///
/// Blocks below this height were produced before the hard fork and use the plain
/// Bitcoin block layout.
pub const DEFAULT_FORK_HEIGHT: u32 = 35_000;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Fractional digits used when converting decimal JsonRPC amounts.
    pub amount_decimals: u32,
    /// First height decoded with the extended (proof-of-stake) block layout.
    pub fork_height: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            amount_decimals: DEFAULT_AMOUNT_DECIMALS,
            fork_height: DEFAULT_FORK_HEIGHT,
        }
    }
}
