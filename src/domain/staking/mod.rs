//! Wallet-addressed staking state and the rules derived from it.

pub mod backend;
pub mod ledger;
pub mod tiers;

pub use backend::{BackendError, StakePosition, StakingBackend};
pub use ledger::InMemoryLedger;
pub use tiers::{Discount, Tier, TierPolicy, TierThreshold};
