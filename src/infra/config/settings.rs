//! Process settings that are not part of the staking configuration.

use super::resolver::{ConfigError, EnvSource, Network, ProcessEnv};
use super::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_UNSTAKE_COOLDOWN_SECS, ENV_HOST, ENV_PORT, ENV_RPC_URL,
    ENV_UNSTAKE_COOLDOWN_SECS,
};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Explicit RPC endpoint; when unset the network's public endpoint is used.
    pub rpc_url: Option<String>,
    pub unstake_cooldown: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rpc_url: None,
            unstake_cooldown: Duration::from_secs(DEFAULT_UNSTAKE_COOLDOWN_SECS),
        }
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// Unset or empty variables fall back to defaults; unparsable numbers are errors.
    pub fn from_source(env: &impl EnvSource) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let set = |key: &str| env.var(key).filter(|v| !v.trim().is_empty());

        let host = set(ENV_HOST).unwrap_or(defaults.host);
        let port = match set(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidSetting {
                name: ENV_PORT,
                value: raw,
            })?,
            None => defaults.port,
        };
        let unstake_cooldown = match set(ENV_UNSTAKE_COOLDOWN_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidSetting {
                    name: ENV_UNSTAKE_COOLDOWN_SECS,
                    value: raw,
                })?,
            None => defaults.unstake_cooldown,
        };

        Ok(Self {
            host,
            port,
            rpc_url: set(ENV_RPC_URL),
            unstake_cooldown,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rpc_url_for(&self, network: &Network) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| network.default_rpc_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = ServerSettings::from_source(&HashMap::new()).unwrap();
        assert_eq!(settings, ServerSettings::default());
        assert_eq!(settings.bind_addr(), "0.0.0.0:3001");
        assert_eq!(
            settings.rpc_url_for(&Network::MainnetBeta),
            "https://api.mainnet-beta.solana.com"
        );
    }

    #[test]
    fn overrides_are_read() {
        let settings = ServerSettings::from_source(&env(&[
            (ENV_HOST, "127.0.0.1"),
            (ENV_PORT, "8080"),
            (ENV_RPC_URL, "http://localhost:8899"),
            (ENV_UNSTAKE_COOLDOWN_SECS, "60"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr(), "127.0.0.1:8080");
        assert_eq!(settings.rpc_url_for(&Network::Devnet), "http://localhost:8899");
        assert_eq!(settings.unstake_cooldown, Duration::from_secs(60));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ServerSettings::from_source(&env(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { name: ENV_PORT, .. }));
    }
}
