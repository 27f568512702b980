//! The staking service.
//!
//! Sits between the HTTP handlers and the collaborators:
//! 1.  validates wallet addresses, amounts and cart totals;
//! 2.  reads and updates positions through the `StakingBackend`;
//! 3.  derives tier, discount and access flags from the `TierPolicy`;
//! 4.  checks on-chain payments through the `PaymentVerifier` before crediting stakes.

use crate::domain::staking::{BackendError, Discount, StakePosition, StakingBackend, Tier, TierPolicy};
use crate::infra::config::StakingConfig;
use crate::infra::solana::{PaymentCheck, PaymentError, PaymentVerdict, PaymentVerifier};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("'{0}' is not a valid wallet address")]
    InvalidAddress(String),
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("cart_total must be a number between 0 and 1e12, got '{0}'")]
    InvalidCartTotal(String),
    #[error("{0}")]
    InvalidSignature(String),
    #[error("payment not verified: {}", .0.reason.as_deref().unwrap_or("unknown reason"))]
    PaymentNotVerified(PaymentVerdict),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("{0}")]
    Rpc(String),
}

impl From<PaymentError> for ServiceError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidSignature(msg) => ServiceError::InvalidSignature(msg),
            PaymentError::Rpc(e) => {
                warn!("payment verification RPC failure: {}", e);
                ServiceError::Rpc(format!("Solana RPC request failed: {}", e))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStatus {
    #[serde(flatten)]
    pub position: StakePosition,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInfo {
    pub eligible: bool,
    pub tier: Tier,
    pub discount_percent: u8,
    pub mint_address: String,
    pub store_wallet: String,
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnstakeRelease {
    #[serde(flatten)]
    pub status: WalletStatus,
    pub released: u64,
}

pub struct StakingService {
    config: Arc<StakingConfig>,
    policy: TierPolicy,
    backend: Arc<dyn StakingBackend>,
    verifier: Arc<dyn PaymentVerifier>,
}

/// Parses a base58 wallet address and returns its canonical form.
pub fn parse_wallet(user_address: &str) -> Result<String, ServiceError> {
    let trimmed = user_address.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::MissingParameter("user_address"));
    }
    Pubkey::from_str(trimmed)
        .map(|pk| pk.to_string())
        .map_err(|_| ServiceError::InvalidAddress(trimmed.to_string()))
}

/// Largest cart total accepted; keeps cent rounding exact and the discount finite.
pub const MAX_CART_TOTAL: f64 = 1e12;

pub fn parse_cart_total(raw: &str) -> Result<f64, ServiceError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && (0.0..=MAX_CART_TOTAL).contains(&v) => Ok(v),
        _ => Err(ServiceError::InvalidCartTotal(raw.to_string())),
    }
}

impl StakingService {
    pub fn new(
        config: Arc<StakingConfig>,
        policy: TierPolicy,
        backend: Arc<dyn StakingBackend>,
        verifier: Arc<dyn PaymentVerifier>,
    ) -> Self {
        Self {
            config,
            policy,
            backend,
            verifier,
        }
    }

    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    async fn wallet_status(&self, wallet: &str) -> Result<WalletStatus, ServiceError> {
        let position = self.backend.position(wallet).await?;
        Ok(self.with_tier(position))
    }

    fn with_tier(&self, position: StakePosition) -> WalletStatus {
        let tier = self.policy.tier_for(position.staked);
        WalletStatus { position, tier }
    }

    pub async fn status(&self, user_address: &str) -> Result<WalletStatus, ServiceError> {
        let wallet = parse_wallet(user_address)?;
        self.wallet_status(&wallet).await
    }

    pub async fn visibility(&self, user_address: &str) -> Result<bool, ServiceError> {
        let status = self.status(user_address).await?;
        Ok(self.policy.is_visible(status.tier))
    }

    pub async fn exclusive(&self, user_address: &str) -> Result<bool, ServiceError> {
        let status = self.status(user_address).await?;
        Ok(self.policy.is_exclusive(status.tier))
    }

    pub async fn checkout(&self, user_address: &str) -> Result<CheckoutInfo, ServiceError> {
        let status = self.status(user_address).await?;
        Ok(CheckoutInfo {
            eligible: self.policy.is_visible(status.tier),
            tier: status.tier,
            discount_percent: self.policy.discount_percent(status.tier),
            mint_address: self.config.mint_address.clone(),
            store_wallet: self.config.zoo_store_wallet.clone(),
            network: self.config.network.to_string(),
        })
    }

    pub async fn discount(&self, user_address: &str, cart_total: &str) -> Result<Discount, ServiceError> {
        let wallet = parse_wallet(user_address)?;
        let cart_total = parse_cart_total(cart_total)?;
        let status = self.wallet_status(&wallet).await?;
        Ok(self.policy.discount(status.tier, cart_total))
    }

    /// Credits a stake after checking `signature` moved `amount` from the wallet to the store.
    pub async fn stake(
        &self,
        user_address: &str,
        amount: u64,
        signature: &str,
    ) -> Result<WalletStatus, ServiceError> {
        let wallet = parse_wallet(user_address)?;
        if amount == 0 {
            return Err(ServiceError::InvalidAmount);
        }
        let signature = signature.trim();
        if signature.is_empty() {
            return Err(ServiceError::MissingParameter("tx_signature"));
        }
        // Skip the RPC round trip for a replay; the ledger checks again when crediting.
        if self.backend.signature_used(signature).await? {
            return Err(BackendError::SignatureAlreadyUsed(signature.to_string()).into());
        }

        let verdict = self
            .verifier
            .verify(&PaymentCheck {
                signature: signature.to_string(),
                payer: wallet.clone(),
                amount,
            })
            .await?;
        if !verdict.verified {
            return Err(ServiceError::PaymentNotVerified(verdict));
        }

        let position = self.backend.stake(&wallet, amount, signature).await?;
        Ok(self.with_tier(position))
    }

    pub async fn request_unstake(&self, user_address: &str, amount: u64) -> Result<WalletStatus, ServiceError> {
        let wallet = parse_wallet(user_address)?;
        if amount == 0 {
            return Err(ServiceError::InvalidAmount);
        }
        let position = self.backend.request_unstake(&wallet, amount).await?;
        Ok(self.with_tier(position))
    }

    pub async fn complete_unstake(&self, user_address: &str) -> Result<UnstakeRelease, ServiceError> {
        let wallet = parse_wallet(user_address)?;
        let (position, released) = self.backend.complete_unstake(&wallet).await?;
        Ok(UnstakeRelease {
            status: self.with_tier(position),
            released,
        })
    }

    /// Unlike `stake`, a negative verdict is a normal result here, not an error.
    pub async fn verify_payment(
        &self,
        signature: &str,
        user_address: &str,
        amount: u64,
    ) -> Result<PaymentVerdict, ServiceError> {
        let wallet = parse_wallet(user_address)?;
        if amount == 0 {
            return Err(ServiceError::InvalidAmount);
        }
        let signature = signature.trim();
        if signature.is_empty() {
            return Err(ServiceError::MissingParameter("signature"));
        }
        Ok(self
            .verifier
            .verify(&PaymentCheck {
                signature: signature.to_string(),
                payer: wallet,
                amount,
            })
            .await?)
    }
}
