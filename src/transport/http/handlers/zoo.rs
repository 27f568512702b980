use crate::transport::http::handlers::common::{json_422, respond};
use crate::transport::http::types::{AppState, PaymentVerification, VerifyPaymentRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// A transfer that does not check out is still a 200 with `verified: false`.
#[utoipa::path(
    post,
    path = "/api/zoo/verify-payment",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Verification result", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 502, description = "Solana RPC failure", body = ApiResponse)
    )
)]
pub async fn verify_payment_handler(
    State(state): State<AppState>,
    request: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"signature\": ..., \"user_address\": ..., \"amount\": ...}")
                .into_response()
        }
    };
    let result = state
        .service
        .verify_payment(&request.signature, &request.user_address, request.amount)
        .await;
    respond(result.map(|verdict| PaymentVerification {
        signature: request.signature.trim().to_string(),
        verdict,
    }))
}
