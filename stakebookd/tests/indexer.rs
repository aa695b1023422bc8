mod common;

use common::StubSource;
use stakebook_common::{Network, MAINNET_MAGIC, TESTNET_MAGIC};
use stakebookdlib::{
    config::StakebookdConfig,
    error::IndexerError,
    indexer::{init_logging, start_indexer},
};

#[tokio::test]
async fn starts_against_main_chain() {
    init_logging();
    let indexer = start_indexer(StakebookdConfig::default(), StubSource::new("main"))
        .await
        .unwrap();

    assert_eq!(indexer.service().network(), "livenet");
    assert_eq!(indexer.service().params().net, MAINNET_MAGIC);
    assert_eq!(indexer.service().get_best_block_height().await.unwrap(), 41_000);
    indexer.log_status().await;
}

#[tokio::test]
async fn starts_against_test_chain() {
    init_logging();
    let config = StakebookdConfig {
        network: Network::Testnet,
        ..Default::default()
    };
    let indexer = start_indexer(config, StubSource::new("test")).await.unwrap();

    assert!(indexer.service().is_testnet());
    assert_eq!(indexer.service().params().net, TESTNET_MAGIC);
    assert_eq!(indexer.config().network, Network::Testnet);
}

#[tokio::test]
async fn network_mismatch_is_config_error() {
    init_logging();
    let result = start_indexer(StakebookdConfig::default(), StubSource::new("test")).await;
    match result {
        Err(e @ IndexerError::ConfigError(_)) => assert!(e.is_fatal()),
        Err(e) => panic!("expected config error, got {e}"),
        Ok(_) => panic!("expected config error"),
    }
}

#[tokio::test]
async fn public_validator_address_is_refused() {
    let mut config = StakebookdConfig::default();
    config.validator_settings.validator_jsonrpc_listen_address = "8.8.8.8:3889".parse().unwrap();
    assert!(matches!(
        start_indexer(config, StubSource::new("main")).await,
        Err(IndexerError::ConfigError(_))
    ));
}
