//! Verification of SPL token payments to the store wallet.

use crate::infra::config::StakingConfig;
use crate::infra::solana::client::SolanaRpc;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use solana_client::client_error::ClientError;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use tracing::{info, warn};

/// A payment the caller claims to have made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCheck {
    pub signature: String,
    pub payer: String,
    /// Minimum amount, in raw token units, the store wallet must have received.
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerdict {
    pub verified: bool,
    pub amount_received: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PaymentVerdict {
    pub fn verified(amount_received: u64) -> Self {
        Self {
            verified: true,
            amount_received,
            reason: None,
        }
    }

    pub fn rejected(amount_received: u64, reason: impl Into<String>) -> Self {
        Self {
            verified: false,
            amount_received,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("invalid transaction signature: {0}")]
    InvalidSignature(String),
    #[error("Solana RPC request failed: {0}")]
    Rpc(#[from] ClientError),
}

#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    async fn verify(&self, check: &PaymentCheck) -> Result<PaymentVerdict, PaymentError>;
}

/// Token balance movement of one transaction, for one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferInspection {
    pub failed: bool,
    /// Change of the recipient's balance (raw units); positive when it received tokens.
    pub recipient_delta: i128,
    /// Change of the payer's balance (raw units); negative when it paid.
    pub payer_delta: i128,
}

impl TransferInspection {
    pub fn verdict(&self, expected_amount: u64) -> PaymentVerdict {
        let received = u64::try_from(self.recipient_delta.max(0)).unwrap_or(u64::MAX);
        if self.failed {
            return PaymentVerdict::rejected(0, "transaction failed on-chain");
        }
        if self.recipient_delta < i128::from(expected_amount) {
            return PaymentVerdict::rejected(
                received,
                format!(
                    "store wallet received {} (expected at least {})",
                    received, expected_amount
                ),
            );
        }
        if self.payer_delta >= 0 {
            return PaymentVerdict::rejected(received, "payer balance did not decrease");
        }
        if -self.payer_delta < i128::from(expected_amount) {
            return PaymentVerdict::rejected(
                received,
                format!(
                    "payer sent {} (expected at least {})",
                    -self.payer_delta, expected_amount
                ),
            );
        }
        PaymentVerdict::verified(received)
    }
}

fn owner_balance(balances: Option<&JsonValue>, mint: &str, owner: &str) -> i128 {
    balances
        .and_then(JsonValue::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter(|b| b["mint"].as_str() == Some(mint) && b["owner"].as_str() == Some(owner))
                .filter_map(|b| b["uiTokenAmount"]["amount"].as_str())
                .filter_map(|raw| raw.parse::<i128>().ok())
                .sum::<i128>()
        })
        .unwrap_or(0)
}

/// Reads pre/post token balances of a `jsonParsed` `getTransaction` result.
pub fn inspect_token_transfer(
    tx: &JsonValue,
    mint: &str,
    recipient: &str,
    payer: &str,
) -> TransferInspection {
    let meta = &tx["meta"];
    let failed = !meta["err"].is_null();
    let pre = meta.get("preTokenBalances");
    let post = meta.get("postTokenBalances");

    TransferInspection {
        failed,
        recipient_delta: owner_balance(post, mint, recipient) - owner_balance(pre, mint, recipient),
        payer_delta: owner_balance(post, mint, payer) - owner_balance(pre, mint, payer),
    }
}

/// Checks payments against the configured mint and store wallet on the cluster.
pub struct SolanaPaymentVerifier {
    rpc: SolanaRpc,
    mint: String,
    store_wallet: String,
}

impl SolanaPaymentVerifier {
    pub fn new(rpc: SolanaRpc, config: &StakingConfig) -> Self {
        Self {
            rpc,
            mint: config.mint_address.clone(),
            store_wallet: config.zoo_store_wallet.clone(),
        }
    }
}

#[async_trait]
impl PaymentVerifier for SolanaPaymentVerifier {
    async fn verify(&self, check: &PaymentCheck) -> Result<PaymentVerdict, PaymentError> {
        let signature = Signature::from_str(&check.signature)
            .map_err(|e| PaymentError::InvalidSignature(format!("{}: {}", check.signature, e)))?;

        let verdict = match self.rpc.parsed_transaction(&signature).await? {
            None => PaymentVerdict::rejected(0, "transaction not found"),
            Some(tx) => inspect_token_transfer(&tx, &self.mint, &self.store_wallet, &check.payer)
                .verdict(check.amount),
        };

        if verdict.verified {
            info!(signature = %check.signature, payer = %check.payer, amount = verdict.amount_received, "payment verified");
        } else {
            warn!(signature = %check.signature, payer = %check.payer, reason = ?verdict.reason, "payment rejected");
        }
        Ok(verdict)
    }
}
