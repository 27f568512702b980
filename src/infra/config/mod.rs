//! Centralized configuration (environment variables + fallback file + defaults).
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `STAKING_PROGRAM_ID` | Staking program id | required (or file) |
//! | `MINT_ADDRESS` | SPL token mint used for staking and payments | required (or file) |
//! | `ZOO_STORE_WALLET` | Merchant wallet receiving payments | required (or file) |
//! | `SOLANA_NETWORK` | `mainnet-beta`, anything else means `devnet` | `devnet` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3001` |
//! | `SOLANA_RPC_URL` | RPC endpoint override | public endpoint of the network |
//! | `UNSTAKE_COOLDOWN_SECS` | Delay between unstake request and release | `604800` |
//! | `RUST_LOG` | Log filter | `info,tower_http=info` |

pub mod resolver;
pub mod settings;

pub use resolver::{
    resolve, ConfigError, ConfigFileLoader, ConfigResolver, EnvSource, Network,
    PassThroughLoader, ProcessEnv, StakingConfig, ValidatingLoader,
};
pub use settings::ServerSettings;

pub const ENV_PROGRAM_ID: &str = "STAKING_PROGRAM_ID";
pub const ENV_MINT_ADDRESS: &str = "MINT_ADDRESS";
pub const ENV_NETWORK: &str = "SOLANA_NETWORK";
pub const ENV_STORE_WALLET: &str = "ZOO_STORE_WALLET";

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_RPC_URL: &str = "SOLANA_RPC_URL";
pub const ENV_UNSTAKE_COOLDOWN_SECS: &str = "UNSTAKE_COOLDOWN_SECS";

/// Name of the fallback file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "staking-config.json";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_UNSTAKE_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";
