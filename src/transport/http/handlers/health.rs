use crate::transport::http::handlers::common::ok_json;
use crate::transport::http::types::{ApiResponse, AppState, HealthResponse};
use axum::extract::State;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; reports the active backend and readiness", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.content.is_ready();
    ok_json(&HealthResponse {
        status: if ready { "ok" } else { "loading" }.to_string(),
        backend: state.content.coordinator().backend_kind(),
        ready,
    })
}
