use crate::transport::http::types::{LivenessResponse, SERVICE_NAME};
use axum::Json;

/// Liveness only: does not touch configuration, backend or RPC.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = LivenessResponse)
    )
)]
pub async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
    })
}
