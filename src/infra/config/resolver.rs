//! Resolution of the staking configuration.
//!
//! The configuration comes from exactly one of two sources:
//! 1. the environment, when `STAKING_PROGRAM_ID`, `MINT_ADDRESS` and `ZOO_STORE_WALLET`
//!    are all set to non-empty values;
//! 2. otherwise `staking-config.json` in the working directory, parsed as-is.
//!
//! There is no merge between the two. Resolve once at startup and pass the result along.

use super::{
    CONFIG_FILE_NAME, ENV_MINT_ADDRESS, ENV_NETWORK, ENV_PROGRAM_ID, ENV_STORE_WALLET,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const NETWORK_DEVNET: &str = "devnet";
const NETWORK_MAINNET_BETA: &str = "mainnet-beta";

/// Solana cluster the service talks to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Devnet,
    MainnetBeta,
    /// A value read from the fallback file that is neither `devnet` nor `mainnet-beta`.
    /// Kept verbatim; RPC endpoint selection treats it as devnet.
    Other(String),
}

impl Network {
    /// Normalizes an environment value: only the exact string `mainnet-beta` selects mainnet.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(NETWORK_MAINNET_BETA) => Network::MainnetBeta,
            _ => Network::Devnet,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Network::Devnet => NETWORK_DEVNET,
            Network::MainnetBeta => NETWORK_MAINNET_BETA,
            Network::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Network::Other(_))
    }

    /// Public RPC endpoint for the cluster.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Network::Devnet | Network::Other(_) => "https://api.devnet.solana.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            NETWORK_DEVNET => Network::Devnet,
            NETWORK_MAINNET_BETA => Network::MainnetBeta,
            _ => Network::Other(raw),
        })
    }
}

/// Runtime staking configuration.
///
/// Unreserved keys from the fallback file are kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingConfig {
    #[serde(default)]
    pub program_id: String,
    #[serde(default)]
    pub mint_address: String,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub zoo_store_wallet: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Missing staking configuration: set {}, {} and {} (optionally {}) or create {}",
        ENV_PROGRAM_ID,
        ENV_MINT_ADDRESS,
        ENV_STORE_WALLET,
        ENV_NETWORK,
        path.display()
    )]
    ConfigurationMissing { path: PathBuf },

    #[error("Failed to parse {}: {source}", path.display())]
    ConfigurationMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ConfigurationUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid staking configuration in {}: {reason}", path.display())]
    ConfigurationInvalid { path: PathBuf, reason: String },

    #[error("{name} has an invalid value: {value:?}")]
    InvalidSetting { name: &'static str, value: String },
}

/// Read access to environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Turns the contents of the fallback file into a `StakingConfig`.
pub trait ConfigFileLoader: Send + Sync {
    fn load(&self, path: &Path, contents: &str) -> Result<StakingConfig, ConfigError>;
}

/// Parses the file and trusts whatever it contains.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughLoader;

impl ConfigFileLoader for PassThroughLoader {
    fn load(&self, path: &Path, contents: &str) -> Result<StakingConfig, ConfigError> {
        serde_json::from_str(contents).map_err(|source| ConfigError::ConfigurationMalformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Parses the file, then rejects empty required fields and unknown networks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatingLoader;

impl ConfigFileLoader for ValidatingLoader {
    fn load(&self, path: &Path, contents: &str) -> Result<StakingConfig, ConfigError> {
        let config = PassThroughLoader.load(path, contents)?;
        let invalid = |reason: String| ConfigError::ConfigurationInvalid {
            path: path.to_path_buf(),
            reason,
        };

        for (key, value) in [
            ("programId", &config.program_id),
            ("mintAddress", &config.mint_address),
            ("zooStoreWallet", &config.zoo_store_wallet),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("'{}' must be a non-empty string", key)));
            }
        }
        if !config.network.is_recognized() {
            return Err(invalid(format!(
                "'network' must be '{}' or '{}', got '{}'",
                NETWORK_DEVNET, NETWORK_MAINNET_BETA, config.network
            )));
        }
        Ok(config)
    }
}

/// Resolves the staking configuration from the environment or the fallback file.
pub struct ConfigResolver<E = ProcessEnv> {
    env: E,
    base_dir: Option<PathBuf>,
    loader: Box<dyn ConfigFileLoader>,
}

impl Default for ConfigResolver<ProcessEnv> {
    fn default() -> Self {
        Self::with_env(ProcessEnv)
    }
}

impl<E: EnvSource> ConfigResolver<E> {
    pub fn with_env(env: E) -> Self {
        Self {
            env,
            base_dir: None,
            loader: Box::new(PassThroughLoader),
        }
    }

    /// Looks for the fallback file in `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_loader(mut self, loader: impl ConfigFileLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn config_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.join(CONFIG_FILE_NAME),
            None => PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    /// Re-reads both sources on every call.
    pub fn resolve(&self) -> Result<StakingConfig, ConfigError> {
        if let Some(config) = self.from_env() {
            info!(network = %config.network, "staking config resolved from environment");
            return Ok(config);
        }

        let path = self.config_path();
        debug!(path = %path.display(), "environment incomplete, trying fallback file");
        if !path.is_file() {
            return Err(ConfigError::ConfigurationMissing { path });
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|source| ConfigError::ConfigurationUnreadable {
                path: path.clone(),
                source,
            })?;
        let config = self.loader.load(&path, &contents)?;
        info!(path = %path.display(), network = %config.network, "staking config resolved from file");
        Ok(config)
    }

    fn required(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|v| !v.is_empty())
    }

    fn from_env(&self) -> Option<StakingConfig> {
        let program_id = self.required(ENV_PROGRAM_ID)?;
        let mint_address = self.required(ENV_MINT_ADDRESS)?;
        let zoo_store_wallet = self.required(ENV_STORE_WALLET)?;
        let network = Network::from_env_value(self.env.var(ENV_NETWORK).as_deref());

        Some(StakingConfig {
            program_id,
            mint_address,
            network,
            zoo_store_wallet,
            extra: Map::new(),
        })
    }
}

/// Resolves against the process environment and working directory.
pub fn resolve() -> Result<StakingConfig, ConfigError> {
    ConfigResolver::<ProcessEnv>::default().resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env(network: Option<&str>) -> HashMap<String, String> {
        let mut vars = env(&[
            (ENV_PROGRAM_ID, "Prog111"),
            (ENV_MINT_ADDRESS, "Mint111"),
            (ENV_STORE_WALLET, "Wallet111"),
        ]);
        if let Some(n) = network {
            vars.insert(ENV_NETWORK.to_string(), n.to_string());
        }
        vars
    }

    fn write_config(dir: &Path, contents: &str) {
        std::fs::write(dir.join(CONFIG_FILE_NAME), contents).unwrap();
    }

    #[test]
    fn env_takes_precedence_over_file() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"{"programId":"FILE","mintAddress":"FILE","network":"mainnet-beta","zooStoreWallet":"FILE"}"#,
        );

        let config = ConfigResolver::with_env(full_env(None))
            .with_base_dir(dir.path())
            .resolve()
            .unwrap();

        assert_eq!(config.program_id, "Prog111");
        assert_eq!(config.mint_address, "Mint111");
        assert_eq!(config.zoo_store_wallet, "Wallet111");
        assert_eq!(config.network, Network::Devnet);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn only_exact_mainnet_beta_selects_mainnet() {
        let dir = tempfile::tempdir().unwrap();
        let resolve_with = |network: Option<&str>| {
            ConfigResolver::with_env(full_env(network))
                .with_base_dir(dir.path())
                .resolve()
                .unwrap()
                .network
        };

        assert_eq!(resolve_with(Some("mainnet-beta")), Network::MainnetBeta);
        for other in [None, Some(""), Some("mainnet"), Some("Mainnet-Beta"), Some(" mainnet-beta"), Some("testnet")] {
            assert_eq!(resolve_with(other), Network::Devnet, "value {:?}", other);
        }
    }

    #[test]
    fn any_missing_required_var_falls_back_to_file() {
        for missing in [ENV_PROGRAM_ID, ENV_MINT_ADDRESS, ENV_STORE_WALLET] {
            let dir = tempfile::tempdir().unwrap();
            write_config(
                dir.path(),
                r#"{"programId":"F","mintAddress":"F","network":"devnet","zooStoreWallet":"F"}"#,
            );
            let mut vars = full_env(Some("mainnet-beta"));
            vars.remove(missing);

            let config = ConfigResolver::with_env(vars)
                .with_base_dir(dir.path())
                .resolve()
                .unwrap();
            assert_eq!(config.program_id, "F", "missing {}", missing);
        }
    }

    #[test]
    fn empty_required_var_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = full_env(None);
        vars.insert(ENV_MINT_ADDRESS.to_string(), String::new());

        let err = ConfigResolver::with_env(vars)
            .with_base_dir(dir.path())
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConfigurationMissing { .. }));
    }

    #[test]
    fn missing_everything_names_every_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigResolver::with_env(env(&[(ENV_PROGRAM_ID, "P")]))
            .with_base_dir(dir.path())
            .resolve()
            .unwrap_err();

        assert!(matches!(err, ConfigError::ConfigurationMissing { .. }));
        let message = err.to_string();
        for name in [ENV_PROGRAM_ID, ENV_MINT_ADDRESS, ENV_NETWORK, ENV_STORE_WALLET, CONFIG_FILE_NAME] {
            assert!(message.contains(name), "{} not in {}", name, message);
        }
    }

    #[test]
    fn file_contents_pass_through_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let original = json!({
            "programId": "P",
            "mintAddress": "M",
            "network": "mainnet-beta",
            "zooStoreWallet": "W",
            "extra": "X"
        });
        write_config(dir.path(), &original.to_string());

        let config = ConfigResolver::with_env(HashMap::new())
            .with_base_dir(dir.path())
            .resolve()
            .unwrap();

        assert_eq!(config.network, Network::MainnetBeta);
        assert_eq!(config.extra.get("extra"), Some(&json!("X")));
        assert_eq!(serde_json::to_value(&config).unwrap(), original);
    }

    #[test]
    fn file_network_is_not_normalized() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), r#"{"programId":"P","mintAddress":"M","network":"Mainnet","zooStoreWallet":"W"}"#);

        let config = ConfigResolver::with_env(HashMap::new())
            .with_base_dir(dir.path())
            .resolve()
            .unwrap();
        assert_eq!(config.network, Network::Other("Mainnet".to_string()));
        assert_eq!(config.network.default_rpc_url(), Network::Devnet.default_rpc_url());
    }

    #[test]
    fn incomplete_file_is_trusted() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), r#"{"programId":"P"}"#);

        let config = ConfigResolver::with_env(HashMap::new())
            .with_base_dir(dir.path())
            .resolve()
            .unwrap();
        assert_eq!(config.program_id, "P");
        assert_eq!(config.mint_address, "");
        assert_eq!(config.network, Network::Devnet);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "{ programId: ");

        let err = ConfigResolver::with_env(HashMap::new())
            .with_base_dir(dir.path())
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConfigurationMalformed { .. }));
    }

    #[test]
    fn non_utf8_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), [0xff, 0xfe, 0xfd]).unwrap();

        let err = ConfigResolver::with_env(HashMap::new())
            .with_base_dir(dir.path())
            .resolve()
            .unwrap_err();
        match err {
            ConfigError::ConfigurationUnreadable { path, .. } => {
                assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
            }
            other => panic!("expected ConfigurationUnreadable, got {:?}", other),
        }
    }

    #[test]
    fn validating_loader_rejects_what_pass_through_accepts() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), r#"{"programId":"P","mintAddress":"","zooStoreWallet":"W"}"#);

        let err = ConfigResolver::with_env(HashMap::new())
            .with_base_dir(dir.path())
            .with_loader(ValidatingLoader)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConfigurationInvalid { .. }));
        assert!(err.to_string().contains("mintAddress"));

        write_config(dir.path(), r#"{"programId":"P","mintAddress":"M","network":"testnet","zooStoreWallet":"W"}"#);
        let err = ConfigResolver::with_env(HashMap::new())
            .with_base_dir(dir.path())
            .with_loader(ValidatingLoader)
            .resolve()
            .unwrap_err();
        assert!(err.to_string().contains("testnet"));
    }
}
