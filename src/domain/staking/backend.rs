//! The staking-state source of truth, behind a trait so another backend can be plugged in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Staking state of one wallet. Amounts are raw token units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakePosition {
    pub user_address: String,
    pub staked: u64,
    pub pending_unstake: u64,
    /// Set iff `pending_unstake > 0`.
    pub unlock_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StakePosition {
    pub fn empty(user_address: &str) -> Self {
        Self {
            user_address: user_address.to_string(),
            staked: 0,
            pending_unstake: 0,
            unlock_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("transaction {0} was already credited")]
    SignatureAlreadyUsed(String),
    #[error("cannot unstake {requested}, only {staked} staked")]
    InsufficientStake { requested: u64, staked: u64 },
    #[error("no unstake request pending")]
    NothingToRelease,
    #[error("unstake cooldown active until {unlock_at}")]
    CooldownActive { unlock_at: DateTime<Utc> },
    #[error("staking backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait StakingBackend: Send + Sync {
    /// Unknown wallets get an empty position.
    async fn position(&self, user_address: &str) -> Result<StakePosition, BackendError>;

    async fn signature_used(&self, signature: &str) -> Result<bool, BackendError>;

    /// Credits `amount`; the signature is recorded so it cannot be credited twice.
    async fn stake(
        &self,
        user_address: &str,
        amount: u64,
        signature: &str,
    ) -> Result<StakePosition, BackendError>;

    /// Moves `amount` from staked to pending and restarts the cooldown.
    async fn request_unstake(
        &self,
        user_address: &str,
        amount: u64,
    ) -> Result<StakePosition, BackendError>;

    /// Releases the pending amount once the cooldown has passed; returns it with the new position.
    async fn complete_unstake(
        &self,
        user_address: &str,
    ) -> Result<(StakePosition, u64), BackendError>;
}
