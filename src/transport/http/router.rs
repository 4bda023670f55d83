use crate::app::admin::{FlushReport, Snapshot};
use crate::app::coordinator::WriteState;
use crate::domain::model::{Cat, CollectionKind, Collections, GalleryItem, Gender, Service, Testimonial};
use crate::storage::BackendKind;
use crate::transport::http::handlers::{admin, collections, health};
use crate::transport::http::types::{
    ApiResponse, CollectionStatus, CreatedRecord, HealthResponse, StatusResponse,
};
use crate::transport::http::auth;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        collections::get_collection_handler,
        collections::replace_collection_handler,
        collections::create_record_handler,
        collections::update_record_handler,
        collections::delete_record_handler,
        admin::flush_handler,
        admin::status_handler,
        admin::export_handler,
        admin::import_handler
    ),
    components(schemas(
        ApiResponse,
        HealthResponse,
        StatusResponse,
        CollectionStatus,
        CreatedRecord,
        FlushReport,
        Snapshot,
        Collections,
        CollectionKind,
        WriteState,
        BackendKind,
        Cat,
        Gender,
        Testimonial,
        Service,
        GalleryItem
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/collections/:kind",
            get(collections::get_collection_handler).put(collections::replace_collection_handler),
        )
        .route(
            "/api/collections/:kind/records",
            post(collections::create_record_handler),
        )
        .route(
            "/api/collections/:kind/records/:id",
            put(collections::update_record_handler).delete(collections::delete_record_handler),
        )
        .route("/api/admin/flush", post(admin::flush_handler))
        .route("/api/admin/status", get(admin::status_handler))
        .route("/api/admin/export", get(admin::export_handler))
        .route("/api/admin/import", post(admin::import_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_admin,
        ))
        .with_state(app_state)
}
