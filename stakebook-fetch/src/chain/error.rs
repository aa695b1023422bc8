//! Hold error types for block and transaction parsing.

/// Parser Error Type.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input ended before a field could be fully read.
    #[error("Truncated input: {0}")]
    TruncatedInput(String),

    /// Invalid Data Error
    #[error("Invalid Data Error: {0}")]
    InvalidData(String),

    /// JsonRPC transaction object did not match the expected schema.
    #[error("Malformed transaction JSON: {0}")]
    MalformedTxJson(String),

    /// Decimal amount could not be converted to the smallest unit.
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount {
        /// Amount as received.
        amount: String,
        /// Why it was refused.
        reason: &'static str,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::MalformedTxJson(e.to_string())
    }
}
