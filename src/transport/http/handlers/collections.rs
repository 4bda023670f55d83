use crate::app::editor;
use crate::transport::http::handlers::common::{content_error, internal, ok_json, parse_kind};
use crate::domain::model::{Cats, CollectionKind};
use crate::transport::http::types::{json_422, ApiResponse, AppState, CatView, CreatedRecord};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/api/collections/{kind}",
    params(
        ("kind" = String, Path, description = "Collection (cats, testimonials, services, aboutGallery, facilityGallery)")
    ),
    responses(
        (status = 200, description = "The whole collection, in display order (cats carry their age)", body = ApiResponse),
        (status = 404, description = "Unknown collection", body = ApiResponse)
    )
)]
pub async fn get_collection_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp.into_response(),
    };
    if kind == CollectionKind::Cats {
        let today = chrono::Local::now().date_naive();
        let cats: Vec<CatView> = state
            .content
            .get::<Cats>()
            .await
            .into_iter()
            .map(|cat| CatView::new(cat, today))
            .collect();
        return ok_json(&cats);
    }
    match state.content.get_value(kind).await {
        Ok(value) => ok_json(&value),
        Err(e) => internal(e.to_string()).into_response(),
    }
}

/// Replaces a whole collection. The body is the JSON array of records.
#[utoipa::path(
    put,
    path = "/api/collections/{kind}",
    params(
        ("kind" = String, Path, description = "Collection name")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Collection replaced (saved locally, remote write scheduled)", body = ApiResponse),
        (status = 404, description = "Unknown collection", body = ApiResponse),
        (status = 422, description = "Body does not match the record shape", body = ApiResponse)
    )
)]
pub async fn replace_collection_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp.into_response(),
    };
    let Json(body) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "[{...}, ...]").into_response(),
    };
    match state.content.replace_value(kind, body).await {
        Ok(()) => ok_json(&serde_json::json!({ "collection": kind })),
        Err(e) => content_error(e).into_response(),
    }
}

/// Appends a record; its id is assigned from the current time.
#[utoipa::path(
    post,
    path = "/api/collections/{kind}/records",
    params(
        ("kind" = String, Path, description = "Collection name")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Record created", body = ApiResponse),
        (status = 404, description = "Unknown collection", body = ApiResponse),
        (status = 422, description = "Body does not match the record shape", body = ApiResponse)
    )
)]
pub async fn create_record_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp.into_response(),
    };
    let Json(body) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{...record fields}").into_response(),
    };
    match editor::create_value(&state.content, kind, body).await {
        Ok(id) => ok_json(&CreatedRecord { id }),
        Err(e) => content_error(e).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/collections/{kind}/records/{id}",
    params(
        ("kind" = String, Path, description = "Collection name"),
        ("id" = i64, Path, description = "Record id")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Record updated", body = ApiResponse),
        (status = 404, description = "Unknown collection or record", body = ApiResponse),
        (status = 422, description = "Body does not match the record shape", body = ApiResponse)
    )
)]
pub async fn update_record_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp.into_response(),
    };
    let Json(body) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{...record fields}").into_response(),
    };
    match editor::update_value(&state.content, kind, id, body).await {
        Ok(()) => ok_json(&CreatedRecord { id }),
        Err(e) => content_error(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/collections/{kind}/records/{id}",
    params(
        ("kind" = String, Path, description = "Collection name"),
        ("id" = i64, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record deleted", body = ApiResponse),
        (status = 404, description = "Unknown collection or record", body = ApiResponse)
    )
)]
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp.into_response(),
    };
    match editor::delete_value(&state.content, kind, id).await {
        Ok(()) => ok_json(&CreatedRecord { id }),
        Err(e) => content_error(e).into_response(),
    }
}
