//! Stakebook indexer startup.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stakebook_common::default_registry;
use stakebook_state::{BlockchainSource, StakeChainService};

use crate::{config::StakebookdConfig, error::IndexerError};

/// A running Stakebook indexer.
pub struct Indexer<S> {
    /// Block and transaction service.
    service: StakeChainService<S>,
    /// Config the indexer was started with.
    config: StakebookdConfig,
}

impl<S: BlockchainSource> Indexer<S> {
    /// Returns the block and transaction service.
    pub fn service(&self) -> &StakeChainService<S> {
        &self.service
    }

    /// Returns the config the indexer was started with.
    pub fn config(&self) -> &StakebookdConfig {
        &self.config
    }

    /// Logs the current chain tip.
    pub async fn log_status(&self) {
        match self.service.get_best_block_height().await {
            Ok(height) => info!(
                "Stakebook serving {} at height {}.",
                self.service.network(),
                height
            ),
            Err(e) => warn!("Unable to fetch chain tip: {e}"),
        }
    }
}

/// Starts Indexer service.
///
/// Chain parameters are registered in the process-wide registry. A conflicting
/// registration is returned as [`IndexerError::FatalConfig`].
pub async fn start_indexer<S: BlockchainSource>(
    config: StakebookdConfig,
    source: S,
) -> Result<Indexer<S>, IndexerError> {
    startup_message();
    info!("Starting Stakebook..");
    spawn_indexer(config, source).await
}

/// Initialises the block and transaction service over `source`.
pub async fn spawn_indexer<S: BlockchainSource>(
    config: StakebookdConfig,
    source: S,
) -> Result<Indexer<S>, IndexerError> {
    config.check_config()?;
    info!(
        " - Using node at address {}.",
        config.validator_settings.validator_jsonrpc_listen_address
    );

    let service = StakeChainService::initialise(
        source,
        default_registry(),
        config.service.clone(),
        config.parser,
    )
    .await?;

    if service.is_testnet() != config.network.is_testnet() {
        return Err(IndexerError::ConfigError(format!(
            "Configured for {} but the node serves {}.",
            config.network,
            service.network()
        )));
    }
    info!(
        " - Decoding {} blocks, extended headers from height {}.",
        service.params().name,
        config.parser.fork_height
    );

    Ok(Indexer { service, config })
}

/// Installs the global tracing subscriber.
///
/// The filter is read from `RUST_LOG`, defaulting to `info`. Calling this more than once
/// is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .try_init();
}

/// Prints Stakebook's startup message.
fn startup_message() {
    let welcome_message = r#"
       ┌─────────────────────────────────────────────┐
       │                 S T A K E B O O K           │
       │   block decoding for proof-of-stake chains  │
       └─────────────────────────────────────────────┘

****** Stakebook decodes blocks only, it does not validate consensus rules. ******
    "#;
    println!("{welcome_message}");
}
