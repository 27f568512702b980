use crate::transport::http::handlers::{health, staking, zoo};
use crate::transport::http::types::{
    ApiResponse, AppState, CompleteUnstakeRequest, LivenessResponse, RequestUnstakeRequest,
    StakeRequest, VerifyPaymentRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Method and path of every route, in registration order.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/api/staking/status"),
    ("GET", "/api/staking/visibility"),
    ("GET", "/api/staking/checkout"),
    ("GET", "/api/staking/discount"),
    ("GET", "/api/staking/exclusive"),
    ("POST", "/api/staking/stake"),
    ("POST", "/api/staking/request-unstake"),
    ("POST", "/api/staking/complete-unstake"),
    ("POST", "/api/zoo/verify-payment"),
];

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness_handler,
        staking::status_handler,
        staking::visibility_handler,
        staking::checkout_handler,
        staking::discount_handler,
        staking::exclusive_handler,
        staking::stake_handler,
        staking::request_unstake_handler,
        staking::complete_unstake_handler,
        zoo::verify_payment_handler
    ),
    components(schemas(
        ApiResponse,
        LivenessResponse,
        StakeRequest,
        RequestUnstakeRequest,
        CompleteUnstakeRequest,
        VerifyPaymentRequest
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::liveness_handler))
        .route("/api/staking/status", get(staking::status_handler))
        .route("/api/staking/visibility", get(staking::visibility_handler))
        .route("/api/staking/checkout", get(staking::checkout_handler))
        .route("/api/staking/discount", get(staking::discount_handler))
        .route("/api/staking/exclusive", get(staking::exclusive_handler))
        .route("/api/staking/stake", post(staking::stake_handler))
        .route("/api/staking/request-unstake", post(staking::request_unstake_handler))
        .route("/api/staking/complete-unstake", post(staking::complete_unstake_handler))
        .route("/api/zoo/verify-payment", post(zoo::verify_payment_handler))
        .with_state(app_state)
}
