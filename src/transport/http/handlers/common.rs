use crate::app::ContentError;
use crate::domain::model::CollectionKind;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type ErrorResponse = (StatusCode, Json<ApiResponse>);

pub fn parse_kind(raw: &str) -> Result<CollectionKind, ErrorResponse> {
    CollectionKind::parse(raw).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!(
                "Unknown collection '{}' (expected one of: cats, testimonials, services, aboutGallery, facilityGallery)",
                raw
            ))),
        )
    })
}

/// Serializes `data` into a 200 envelope.
pub fn ok_json<T: Serialize>(data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(v) => (StatusCode::OK, Json(ApiResponse::ok(v))).into_response(),
        Err(e) => internal(format!("Failed to serialize response: {}", e)).into_response(),
    }
}

pub fn internal(message: impl Into<String>) -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::err(message)),
    )
}

pub fn content_error(err: ContentError) -> ErrorResponse {
    let status = match &err {
        ContentError::InvalidPayload { .. } | ContentError::InvalidSnapshot(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ContentError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
        ContentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::err(err.to_string())))
}
