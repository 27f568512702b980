//! Config resolution against the real process environment.
//!
//! Everything lives in one test function because it mutates process-wide env vars.

use fulcanellie_staking_api::infra::config::{
    ConfigError, ConfigResolver, Network, ProcessEnv, ServerSettings, CONFIG_FILE_NAME, ENV_MINT_ADDRESS,
    ENV_NETWORK, ENV_PORT, ENV_PROGRAM_ID, ENV_STORE_WALLET,
};
use serde_json::json;
use std::env;

fn clear_env() {
    for key in [ENV_PROGRAM_ID, ENV_MINT_ADDRESS, ENV_NETWORK, ENV_STORE_WALLET, ENV_PORT] {
        env::remove_var(key);
    }
}

#[test]
fn test_process_env_resolution() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let resolver = ConfigResolver::<ProcessEnv>::default().with_base_dir(dir.path());

    // Nothing anywhere: fail fast, naming every source.
    let err = resolver.resolve().unwrap_err();
    assert!(matches!(err, ConfigError::ConfigurationMissing { .. }));
    assert!(err.to_string().contains(CONFIG_FILE_NAME));

    // Two of three variables are not enough; the file is used.
    let file = json!({
        "programId": "P",
        "mintAddress": "M",
        "network": "mainnet-beta",
        "zooStoreWallet": "W",
        "extra": "X"
    });
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), file.to_string()).unwrap();
    env::set_var(ENV_PROGRAM_ID, "EnvProgram");
    env::set_var(ENV_MINT_ADDRESS, "EnvMint");
    let config = resolver.resolve().unwrap();
    assert_eq!(serde_json::to_value(&config).unwrap(), file);

    // All three: env wins and the file is ignored.
    env::set_var(ENV_STORE_WALLET, "EnvWallet");
    env::set_var(ENV_NETWORK, "mainnet");
    let config = resolver.resolve().unwrap();
    assert_eq!(config.program_id, "EnvProgram");
    assert_eq!(config.zoo_store_wallet, "EnvWallet");
    assert_eq!(config.network, Network::Devnet);
    assert!(config.extra.is_empty());

    env::set_var(ENV_NETWORK, "mainnet-beta");
    assert_eq!(resolver.resolve().unwrap().network, Network::MainnetBeta);

    // Broken file, incomplete env.
    env::remove_var(ENV_MINT_ADDRESS);
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not json").unwrap();
    assert!(matches!(
        resolver.resolve().unwrap_err(),
        ConfigError::ConfigurationMalformed { .. }
    ));

    env::set_var(ENV_PORT, "4010");
    assert_eq!(ServerSettings::from_env().unwrap().port, 4010);

    clear_env();
}
