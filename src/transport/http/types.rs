use crate::app::staking_service::StakingService;
use crate::infra::solana::PaymentVerdict;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub const SERVICE_NAME: &str = "fulcanellie-staking-api";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StakingService>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct LivenessResponse {
    pub ok: bool,
    pub service: String,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WalletQuery {
    /// Base58 wallet address.
    pub user_address: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DiscountQuery {
    /// Base58 wallet address.
    pub user_address: Option<String>,
    /// Cart total in store currency, e.g. `59.99`.
    pub cart_total: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct StakeRequest {
    pub user_address: String,
    /// Raw token units.
    pub amount: u64,
    /// Signature of the transfer from `user_address` to the store wallet.
    pub tx_signature: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RequestUnstakeRequest {
    pub user_address: String,
    /// Raw token units.
    pub amount: u64,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CompleteUnstakeRequest {
    pub user_address: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyPaymentRequest {
    pub signature: String,
    /// Wallet that paid.
    pub user_address: String,
    /// Minimum raw token units the store wallet must have received.
    pub amount: u64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub signature: String,
    #[serde(flatten)]
    pub verdict: PaymentVerdict,
}
