//! Process-memory staking ledger.

use crate::domain::staking::backend::{BackendError, StakePosition, StakingBackend};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Default)]
struct LedgerState {
    positions: HashMap<String, StakePosition>,
    used_signatures: HashSet<String>,
}

pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
    cooldown: chrono::Duration,
}

impl InMemoryLedger {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            cooldown: chrono::Duration::from_std(cooldown).unwrap_or(chrono::Duration::MAX),
        }
    }

    fn unlock_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.cooldown)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl StakingBackend for InMemoryLedger {
    async fn position(&self, user_address: &str) -> Result<StakePosition, BackendError> {
        let state = self.state.read().await;
        Ok(state
            .positions
            .get(user_address)
            .cloned()
            .unwrap_or_else(|| StakePosition::empty(user_address)))
    }

    async fn signature_used(&self, signature: &str) -> Result<bool, BackendError> {
        Ok(self.state.read().await.used_signatures.contains(signature))
    }

    async fn stake(
        &self,
        user_address: &str,
        amount: u64,
        signature: &str,
    ) -> Result<StakePosition, BackendError> {
        if amount == 0 {
            return Err(BackendError::ZeroAmount);
        }
        let mut state = self.state.write().await;
        if !state.used_signatures.insert(signature.to_string()) {
            return Err(BackendError::SignatureAlreadyUsed(signature.to_string()));
        }

        let position = state
            .positions
            .entry(user_address.to_string())
            .or_insert_with(|| StakePosition::empty(user_address));
        position.staked = position.staked.saturating_add(amount);
        position.updated_at = Some(Utc::now());

        info!(user = user_address, amount, staked = position.staked, "stake credited");
        Ok(position.clone())
    }

    async fn request_unstake(
        &self,
        user_address: &str,
        amount: u64,
    ) -> Result<StakePosition, BackendError> {
        if amount == 0 {
            return Err(BackendError::ZeroAmount);
        }
        let now = Utc::now();
        let unlock_at = self.unlock_time(now);

        let mut state = self.state.write().await;
        let staked = state.positions.get(user_address).map(|p| p.staked).unwrap_or(0);
        if amount > staked {
            return Err(BackendError::InsufficientStake {
                requested: amount,
                staked,
            });
        }

        let position = state
            .positions
            .get_mut(user_address)
            .ok_or(BackendError::InsufficientStake { requested: amount, staked: 0 })?;
        position.staked -= amount;
        position.pending_unstake = position.pending_unstake.saturating_add(amount);
        position.unlock_at = Some(unlock_at);
        position.updated_at = Some(now);

        info!(user = user_address, amount, %unlock_at, "unstake requested");
        Ok(position.clone())
    }

    async fn complete_unstake(
        &self,
        user_address: &str,
    ) -> Result<(StakePosition, u64), BackendError> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let position = state
            .positions
            .get_mut(user_address)
            .filter(|p| p.pending_unstake > 0)
            .ok_or(BackendError::NothingToRelease)?;

        if let Some(unlock_at) = position.unlock_at {
            if unlock_at > now {
                return Err(BackendError::CooldownActive { unlock_at });
            }
        }

        let released = position.pending_unstake;
        position.pending_unstake = 0;
        position.unlock_at = None;
        position.updated_at = Some(now);

        info!(user = user_address, released, "unstake completed");
        Ok((position.clone(), released))
    }
}
