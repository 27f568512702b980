use crate::app::staking_service::ServiceError;
use crate::transport::http::handlers::common::{json_422, query_400, respond};
use crate::transport::http::types::{
    AppState, CompleteUnstakeRequest, DiscountQuery, RequestUnstakeRequest,
    StakeRequest, WalletQuery,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

fn user_address(query: &Option<String>) -> &str {
    query.as_deref().unwrap_or_default()
}

#[utoipa::path(
    get,
    path = "/api/staking/status",
    params(WalletQuery),
    responses(
        (status = 200, description = "Staking position and tier of the wallet", body = ApiResponse),
        (status = 400, description = "Missing or invalid user_address", body = ApiResponse)
    )
)]
pub async fn status_handler(
    State(state): State<AppState>,
    query: Result<Query<WalletQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(err) => return query_400(err).into_response(),
    };
    respond(state.service.status(user_address(&query.user_address)).await)
}

#[utoipa::path(
    get,
    path = "/api/staking/visibility",
    params(WalletQuery),
    responses(
        (status = 200, description = "Whether staking features are shown to the wallet", body = ApiResponse),
        (status = 400, description = "Missing or invalid user_address", body = ApiResponse)
    )
)]
pub async fn visibility_handler(
    State(state): State<AppState>,
    query: Result<Query<WalletQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(err) => return query_400(err).into_response(),
    };
    let result = state.service.visibility(user_address(&query.user_address)).await;
    respond(result.map(|visible| json!({ "visible": visible })))
}

#[utoipa::path(
    get,
    path = "/api/staking/checkout",
    params(WalletQuery),
    responses(
        (status = 200, description = "Checkout eligibility and payment target", body = ApiResponse),
        (status = 400, description = "Missing or invalid user_address", body = ApiResponse)
    )
)]
pub async fn checkout_handler(
    State(state): State<AppState>,
    query: Result<Query<WalletQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(err) => return query_400(err).into_response(),
    };
    respond(state.service.checkout(user_address(&query.user_address)).await)
}

#[utoipa::path(
    get,
    path = "/api/staking/discount",
    params(DiscountQuery),
    responses(
        (status = 200, description = "Discount for the cart", body = ApiResponse),
        (status = 400, description = "Missing or invalid parameters", body = ApiResponse)
    )
)]
pub async fn discount_handler(
    State(state): State<AppState>,
    query: Result<Query<DiscountQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(err) => return query_400(err).into_response(),
    };
    let Some(cart_total) = query.cart_total.as_deref() else {
        return respond::<()>(Err(ServiceError::MissingParameter("cart_total")));
    };
    respond(
        state
            .service
            .discount(user_address(&query.user_address), cart_total)
            .await,
    )
}

#[utoipa::path(
    get,
    path = "/api/staking/exclusive",
    params(WalletQuery),
    responses(
        (status = 200, description = "Whether the wallet has exclusive access", body = ApiResponse),
        (status = 400, description = "Missing or invalid user_address", body = ApiResponse)
    )
)]
pub async fn exclusive_handler(
    State(state): State<AppState>,
    query: Result<Query<WalletQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(err) => return query_400(err).into_response(),
    };
    let result = state.service.exclusive(user_address(&query.user_address)).await;
    respond(result.map(|exclusive| json!({ "exclusive": exclusive })))
}

#[utoipa::path(
    post,
    path = "/api/staking/stake",
    request_body = StakeRequest,
    responses(
        (status = 200, description = "Stake credited", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 402, description = "Transfer could not be verified", body = ApiResponse),
        (status = 409, description = "Signature already credited", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 502, description = "Solana RPC failure", body = ApiResponse)
    )
)]
pub async fn stake_handler(
    State(state): State<AppState>,
    request: Result<Json<StakeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"user_address\": ..., \"amount\": ..., \"tx_signature\": ...}")
                .into_response()
        }
    };
    respond(
        state
            .service
            .stake(&request.user_address, request.amount, &request.tx_signature)
            .await,
    )
}

#[utoipa::path(
    post,
    path = "/api/staking/request-unstake",
    request_body = RequestUnstakeRequest,
    responses(
        (status = 200, description = "Unstake requested, cooldown started", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 409, description = "Amount exceeds staked balance", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn request_unstake_handler(
    State(state): State<AppState>,
    request: Result<Json<RequestUnstakeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"user_address\": ..., \"amount\": ...}").into_response(),
    };
    respond(
        state
            .service
            .request_unstake(&request.user_address, request.amount)
            .await,
    )
}

#[utoipa::path(
    post,
    path = "/api/staking/complete-unstake",
    request_body = CompleteUnstakeRequest,
    responses(
        (status = 200, description = "Pending amount released", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 409, description = "Nothing pending or cooldown still running", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn complete_unstake_handler(
    State(state): State<AppState>,
    request: Result<Json<CompleteUnstakeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"user_address\": ...}").into_response(),
    };
    respond(state.service.complete_unstake(&request.user_address).await)
}
