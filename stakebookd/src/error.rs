//! Hold error types for the Indexer and related functionality.

use stakebook_common::ChainParamsError;
use stakebook_state::ServiceError;

/// Stakebook daemon errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// Configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Chain parameters conflict with ones already registered in this process.
    ///
    /// Startup must halt: network data would otherwise be misinterpreted.
    #[error("Fatal configuration error: {0}")]
    FatalConfig(ChainParamsError),
    /// Block and transaction service errors.
    #[error("Service error: {0}")]
    ServiceError(Box<ServiceError>),
}

impl IndexerError {
    /// Returns true if startup must halt rather than retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IndexerError::FatalConfig(_) | IndexerError::ConfigError(_)
        )
    }
}

impl From<ServiceError> for IndexerError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::ChainParamsError(e) => IndexerError::from(e),
            other => IndexerError::ServiceError(Box::new(other)),
        }
    }
}

impl From<ChainParamsError> for IndexerError {
    fn from(value: ChainParamsError) -> Self {
        IndexerError::FatalConfig(value)
    }
}
