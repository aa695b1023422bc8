use figment::Jail;
use std::path::PathBuf;

// Use the explicit library name `stakebookdlib` as defined in Cargo.toml [lib] name.
use stakebook_common::{Network, DEFAULT_FORK_HEIGHT, DEFAULT_MIN_FEE_RATE};
use stakebookdlib::config::{load_config, StakebookdConfig};
use stakebookdlib::error::IndexerError;

#[test]
// Validates loading a full configuration via `load_config`,
// ensuring fields are parsed and `check_config` passes with a mocked cookie file.
fn test_deserialize_full_valid_config() {
    Jail::expect_with(|jail| {
        let validator_cookie_file_name = "validator.cookie";
        jail.create_file(validator_cookie_file_name, "mock validator cookie content")?;

        let toml_str = format!(
            r#"
            network = "testnet"

            [validator_settings]
            validator_jsonrpc_listen_address = "192.168.1.10:13889"
            validator_cookie_path = "{validator_cookie_file_name}"

            [parser]
            amount_decimals = 8
            fork_height = 40000

            [service]
            parse_blocks = false
            min_fee_rate = 1000
        "#
        );
        let temp_toml_path = jail.directory().join("full_config.toml");
        jail.create_file(&temp_toml_path, &toml_str)?;

        let config_result = load_config(&temp_toml_path);
        assert!(
            config_result.is_ok(),
            "load_config failed: {:?}",
            config_result.err()
        );
        let finalized_config = config_result.unwrap();

        assert_eq!(finalized_config.network, Network::Testnet);
        assert_eq!(
            finalized_config
                .validator_settings
                .validator_jsonrpc_listen_address,
            "192.168.1.10:13889".parse().unwrap()
        );
        assert_eq!(
            finalized_config.validator_settings.validator_cookie_path,
            Some(PathBuf::from(validator_cookie_file_name))
        );
        assert_eq!(finalized_config.parser.fork_height, 40_000);
        assert!(!finalized_config.service.parse_blocks);
        assert_eq!(finalized_config.service.min_fee_rate, 1_000);
        Ok(())
    });
}

#[test]
// Validates that a missing or empty TOML file falls back to the defaults.
fn test_minimal_toml_uses_defaults() {
    Jail::expect_with(|jail| {
        let empty_toml_path = jail.directory().join("empty.toml");
        jail.create_file(&empty_toml_path, "")?;
        let config = load_config(&empty_toml_path).expect("empty toml loads");
        assert_eq!(config, StakebookdConfig::default());
        assert_eq!(config.parser.fork_height, DEFAULT_FORK_HEIGHT);
        assert_eq!(config.service.min_fee_rate, DEFAULT_MIN_FEE_RATE);

        let missing = load_config(&jail.directory().join("missing.toml"))
            .expect("missing toml loads");
        assert_eq!(missing, StakebookdConfig::default());
        Ok(())
    });
}

#[test]
// Validates that environment variables override values from the TOML file.
fn test_env_overrides_toml() {
    Jail::expect_with(|jail| {
        let toml_path = jail.directory().join("config.toml");
        jail.create_file(
            &toml_path,
            r#"
            [parser]
            fork_height = 40000
        "#,
        )?;
        jail.set_env("STAKEBOOK_PARSER__FORK_HEIGHT", "50000");
        jail.set_env("STAKEBOOK_SERVICE__MIN_FEE_RATE", "123");
        jail.set_env("STAKEBOOK_NETWORK", "testnet");

        let config = load_config(&toml_path).expect("config loads");
        assert_eq!(config.parser.fork_height, 50_000);
        assert_eq!(config.service.min_fee_rate, 123);
        assert_eq!(config.network, Network::Testnet);
        Ok(())
    });
}

#[test]
// A non-loopback validator requires cookie authentication.
fn test_private_validator_without_cookie_is_rejected() {
    Jail::expect_with(|jail| {
        let toml_path = jail.directory().join("config.toml");
        jail.create_file(
            &toml_path,
            r#"
            [validator_settings]
            validator_jsonrpc_listen_address = "10.0.0.5:3889"
        "#,
        )?;
        assert!(matches!(
            load_config(&toml_path),
            Err(IndexerError::ConfigError(_))
        ));
        Ok(())
    });
}

#[test]
// A cookie path that does not exist is rejected.
fn test_missing_cookie_file_is_rejected() {
    Jail::expect_with(|jail| {
        let toml_path = jail.directory().join("config.toml");
        jail.create_file(
            &toml_path,
            r#"
            [validator_settings]
            validator_jsonrpc_listen_address = "127.0.0.1:3889"
            validator_cookie_path = "does-not-exist.cookie"
        "#,
        )?;
        assert!(matches!(
            load_config(&toml_path),
            Err(IndexerError::ConfigError(_))
        ));
        Ok(())
    });
}

#[test]
// Malformed values surface as configuration errors, not panics.
fn test_invalid_values_are_config_errors() {
    Jail::expect_with(|jail| {
        let toml_path = jail.directory().join("config.toml");
        jail.create_file(
            &toml_path,
            r#"
            network = "regtest"
        "#,
        )?;
        assert!(matches!(
            load_config(&toml_path),
            Err(IndexerError::ConfigError(_))
        ));

        jail.create_file(
            &toml_path,
            r#"
            [parser]
            amount_decimals = 19
        "#,
        )?;
        assert!(matches!(
            load_config(&toml_path),
            Err(IndexerError::ConfigError(_))
        ));
        Ok(())
    });
}
