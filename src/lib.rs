pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::staking_service::{ServiceError, StakingService};
pub use domain::staking::{InMemoryLedger, StakingBackend, TierPolicy};
pub use infra::config::{ConfigError, ConfigResolver, ServerSettings, StakingConfig};
pub use infra::solana;
