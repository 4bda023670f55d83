use crate::app::admin::{self, Snapshot};
use crate::domain::model::CollectionKind;
use crate::storage::BackendKind;
use crate::transport::http::handlers::common::{content_error, ok_json};
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, CollectionStatus, StatusResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

/// Writes every pending collection to the remote backend now.
#[utoipa::path(
    post,
    path = "/api/admin/flush",
    responses(
        (status = 200, description = "Everything pending was synced (or there is no remote backend)", body = ApiResponse),
        (status = 502, description = "Saved locally but not synced remotely", body = ApiResponse)
    )
)]
pub async fn flush_handler(State(state): State<AppState>) -> impl IntoResponse {
    let report = admin::manual_flush(&state.content).await;
    let failed = !report.synced && report.backend != BackendKind::CacheOnly;
    let data = serde_json::to_value(&report).ok();
    let status = if failed {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(ApiResponse {
            success: !failed,
            data,
            error: failed.then(|| report.message.clone()),
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/admin/status",
    responses(
        (status = 200, description = "Backend, connectivity, readiness and per-collection write state", body = ApiResponse)
    )
)]
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = state.content.coordinator();
    let status = StatusResponse {
        backend: coordinator.backend_kind(),
        connected: coordinator.remote_available().await,
        ready: state.content.is_ready(),
        save_delay_secs: coordinator.save_delay().as_secs(),
        pending: coordinator.pending_kinds(),
        collections: CollectionKind::ALL
            .into_iter()
            .map(|kind| CollectionStatus {
                kind,
                state: coordinator.write_state(kind),
            })
            .collect(),
    };
    ok_json(&status)
}

/// Downloads every collection as one JSON backup document.
#[utoipa::path(
    get,
    path = "/api/admin/export",
    responses(
        (status = 200, description = "Snapshot document", body = Snapshot)
    )
)]
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = admin::export_snapshot(&state.content).await;
    let file_name = admin::snapshot_file_name(chrono::Utc::now().date_naive());
    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )],
        Json(snapshot),
    )
        .into_response()
}

/// Replaces every collection present in the uploaded snapshot.
#[utoipa::path(
    post,
    path = "/api/admin/import",
    request_body = Snapshot,
    responses(
        (status = 200, description = "Snapshot imported", body = ApiResponse),
        (status = 422, description = "Malformed snapshot; nothing was changed", body = ApiResponse)
    )
)]
pub async fn import_handler(
    State(state): State<AppState>,
    request: Result<Json<Snapshot>, JsonRejection>,
) -> impl IntoResponse {
    let Json(snapshot) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"cats\": [...], \"testimonials\": [...], ...}").into_response()
        }
    };
    match admin::import(&state.content, snapshot).await {
        Ok(replaced) => ok_json(&serde_json::json!({ "replaced": replaced })),
        Err(e) => content_error(e).into_response(),
    }
}
