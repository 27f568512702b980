use crate::app::staking_service::ServiceError;
use crate::domain::staking::BackendError;
use crate::transport::http::types::ApiResponse;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::MissingParameter(_)
        | ServiceError::InvalidAddress(_)
        | ServiceError::InvalidAmount
        | ServiceError::InvalidCartTotal(_)
        | ServiceError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
        ServiceError::PaymentNotVerified(_) => StatusCode::PAYMENT_REQUIRED,
        ServiceError::Backend(BackendError::ZeroAmount) => StatusCode::BAD_REQUEST,
        ServiceError::Backend(BackendError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Backend(_) => StatusCode::CONFLICT,
        ServiceError::Rpc(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn error_response(err: ServiceError) -> (StatusCode, Json<ApiResponse>) {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("request failed: {}", err);
    } else {
        warn!("request rejected ({}): {}", status.as_u16(), err);
    }
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }),
    )
}

pub fn ok_response<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse>) {
    match serde_json::to_value(data) {
        Ok(value) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(value),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse {
                success: false,
                data: None,
                error: Some(format!("Failed to serialize response: {}", e)),
            }),
        ),
    }
}

pub fn respond<T: Serialize>(result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(data) => ok_response(data).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}

pub fn query_400(err: QueryRejection) -> (StatusCode, Json<ApiResponse>) {
    warn!("request rejected (400): {}", err);
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid query string: {}", err.body_text())),
        }),
    )
}
