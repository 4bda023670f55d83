use crate::app::coordinator::WriteState;
use crate::app::ContentState;
use crate::domain::model::{Cat, CollectionKind};
use crate::storage::BackendKind;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentState>,
    /// Required as `Authorization: Bearer <token>` on every write and admin route.
    /// `None` locks those routes.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(content: Arc<ContentState>, admin_token: Option<String>) -> Self {
        Self {
            content,
            admin_token: admin_token.map(Arc::from),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub backend: BackendKind,
    pub ready: bool,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CollectionStatus {
    pub kind: CollectionKind,
    pub state: WriteState,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StatusResponse {
    pub backend: BackendKind,
    /// Whether the remote backend answered a reachability check just now. False in cache-only mode.
    pub connected: bool,
    pub ready: bool,
    /// Seconds between a save and its remote write.
    pub save_delay_secs: u64,
    pub pending: Vec<CollectionKind>,
    pub collections: Vec<CollectionStatus>,
}

/// A cat as listed by the API, with its display age as of today.
#[derive(Serialize, Debug)]
pub struct CatView {
    #[serde(flatten)]
    pub cat: Cat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

impl CatView {
    pub fn new(cat: Cat, today: NaiveDate) -> Self {
        let age = cat.age_label(today);
        Self { cat, age }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CreatedRecord {
    pub id: i64,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
