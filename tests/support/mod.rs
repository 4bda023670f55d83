//! Shared fixtures: an in-process remote backend and mock HTTP servers standing in
//! for the GitHub contents API and a PostgREST endpoint.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cozy_store::storage::{ActiveBackend, BackendKind, MemoryCache};
use cozy_store::{CollectionKind, LocalCache, PersistenceCoordinator, RemoteBackend, StoreError};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// In-process backend
// ---------------------------------------------------------------------------

/// Remote backend that keeps collections in memory and records every write attempt.
#[derive(Default)]
pub struct RecordingBackend {
    stored: Mutex<HashMap<CollectionKind, JsonValue>>,
    writes: Mutex<Vec<(CollectionKind, JsonValue)>>,
    attempts: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delays: Mutex<Vec<(JsonValue, Duration)>>,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(kind: CollectionKind, value: JsonValue) -> Arc<Self> {
        let backend = Self::new();
        backend.stored.lock().unwrap().insert(kind, value);
        backend
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every write of exactly `payload` take `delay` before it lands.
    pub fn set_write_delay(&self, payload: JsonValue, delay: Duration) {
        self.write_delays.lock().unwrap().push((payload, delay));
    }

    /// Successful writes, in order of completion.
    pub fn writes(&self) -> Vec<(CollectionKind, JsonValue)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn writes_for(&self, kind: CollectionKind) -> Vec<JsonValue> {
        self.writes()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, v)| v)
            .collect()
    }

    /// Every write call, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn stored(&self, kind: CollectionKind) -> Option<JsonValue> {
        self.stored.lock().unwrap().get(&kind).cloned()
    }
}

#[async_trait]
impl RemoteBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn read(&self, kind: CollectionKind) -> Result<Option<JsonValue>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Http {
                backend: "recording",
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.stored(kind))
    }

    async fn write(&self, kind: CollectionKind, collection: &JsonValue) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let delay = self
            .write_delays
            .lock()
            .unwrap()
            .iter()
            .find(|(payload, _)| payload == collection)
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Http {
                backend: "recording",
                status: 500,
                message: "write rejected".to_string(),
            });
        }
        self.stored.lock().unwrap().insert(kind, collection.clone());
        self.writes.lock().unwrap().push((kind, collection.clone()));
        Ok(())
    }

    async fn is_available(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst)
    }
}

pub fn coordinator_with(
    backend: &Arc<RecordingBackend>,
    cache: Arc<dyn LocalCache>,
    delay: Duration,
) -> Arc<PersistenceCoordinator> {
    let client: Arc<dyn RemoteBackend> = backend.clone();
    Arc::new(PersistenceCoordinator::new(
        ActiveBackend::remote(BackendKind::GitHub, client),
        cache,
        delay,
    ))
}

pub fn memory_cache() -> Arc<MemoryCache> {
    Arc::new(MemoryCache::new())
}

pub fn cached_json(cache: &MemoryCache, kind: CollectionKind) -> Option<JsonValue> {
    cache
        .get(kind.key())
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

/// Lets spawned timer tasks run to completion on the current-thread runtime.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Mock servers
// ---------------------------------------------------------------------------

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub const GITHUB_TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub sha: String,
    pub json: JsonValue,
}

#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub path: String,
    pub body: JsonValue,
}

/// GitHub contents API for a single repository, enforcing the sha rule on update.
#[derive(Default)]
pub struct MockGitHub {
    pub files: Mutex<HashMap<String, StoredFile>>,
    pub puts: Mutex<Vec<RecordedPut>>,
    pub refs: Mutex<Vec<String>>,
    next_sha: AtomicUsize,
}

impl MockGitHub {
    pub fn seed(&self, path: &str, json: JsonValue) {
        let sha = self.fresh_sha();
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), StoredFile { sha, json });
    }

    pub fn file(&self, path: &str) -> Option<StoredFile> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }

    fn fresh_sha(&self) -> String {
        format!("sha-{}", self.next_sha.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("token {}", GITHUB_TOKEN))
        .unwrap_or(false)
}

fn github_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn gh_repo(
    State(_mock): State<Arc<MockGitHub>>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return github_error(StatusCode::UNAUTHORIZED, "Bad credentials");
    }
    Json(json!({ "full_name": format!("{}/{}", owner, repo) })).into_response()
}

async fn gh_get_contents(
    State(mock): State<Arc<MockGitHub>>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return github_error(StatusCode::UNAUTHORIZED, "Bad credentials");
    }
    if let Some(r) = query.get("ref") {
        mock.refs.lock().unwrap().push(r.clone());
    }
    match mock.file(&path) {
        Some(file) => {
            let pretty = serde_json::to_string_pretty(&file.json).unwrap();
            let encoded = BASE64.encode(pretty.as_bytes());
            // GitHub wraps the body at 60 columns.
            let wrapped: String = encoded
                .as_bytes()
                .chunks(60)
                .map(|c| format!("{}\n", std::str::from_utf8(c).unwrap()))
                .collect();
            Json(json!({
                "sha": file.sha,
                "content": wrapped,
                "encoding": "base64",
                "path": path,
            }))
            .into_response()
        }
        None => github_error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn gh_put_contents(
    State(mock): State<Arc<MockGitHub>>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> Response {
    if !authorized(&headers) {
        return github_error(StatusCode::UNAUTHORIZED, "Bad credentials");
    }
    mock.puts.lock().unwrap().push(RecordedPut {
        path: path.clone(),
        body: body.clone(),
    });

    let current = mock.file(&path).map(|f| f.sha);
    let given = body.get("sha").and_then(|v| v.as_str()).map(str::to_string);
    match (&current, &given) {
        (Some(current), Some(given)) if current == given => {}
        (Some(_), _) => {
            return github_error(StatusCode::CONFLICT, "sha does not match");
        }
        (None, Some(_)) => {
            return github_error(StatusCode::UNPROCESSABLE_ENTITY, "sha given for a new file");
        }
        (None, None) => {}
    }

    let Some(content) = body.get("content").and_then(|v| v.as_str()) else {
        return github_error(StatusCode::UNPROCESSABLE_ENTITY, "content is required");
    };
    let Ok(bytes) = BASE64.decode(content) else {
        return github_error(StatusCode::UNPROCESSABLE_ENTITY, "content is not base64");
    };
    let Ok(json) = serde_json::from_slice::<JsonValue>(&bytes) else {
        return github_error(StatusCode::UNPROCESSABLE_ENTITY, "content is not JSON");
    };

    let sha = mock.fresh_sha();
    let status = if current.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    mock.files
        .lock()
        .unwrap()
        .insert(path.clone(), StoredFile { sha: sha.clone(), json });
    (status, Json(json!({ "content": { "path": path, "sha": sha } }))).into_response()
}

pub async fn spawn_github(mock: Arc<MockGitHub>) -> String {
    let router = Router::new()
        .route("/repos/:owner/:repo", get(gh_repo))
        .route(
            "/repos/:owner/:repo/contents/*path",
            get(gh_get_contents).put(gh_put_contents),
        )
        .with_state(mock);
    serve(router).await
}

pub const ANON_KEY: &str = "anon-key";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub table: String,
    pub query: HashMap<String, String>,
    pub prefer: Option<String>,
    pub apikey: Option<String>,
    pub bearer: Option<String>,
}

/// PostgREST endpoint over in-memory tables. Unknown tables answer 404.
#[derive(Default)]
pub struct MockRowStore {
    pub tables: Mutex<HashMap<String, Vec<JsonValue>>>,
    pub log: Mutex<Vec<RecordedRequest>>,
    pub fail_inserts: AtomicBool,
}

impl MockRowStore {
    pub fn with_tables(names: &[&str]) -> Arc<Self> {
        let mock = Self::default();
        {
            let mut tables = mock.tables.lock().unwrap();
            for name in names {
                tables.insert(name.to_string(), Vec::new());
            }
        }
        Arc::new(mock)
    }

    pub fn rows(&self, table: &str) -> Vec<JsonValue> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_rows(&self, table: &str, rows: Vec<JsonValue>) {
        self.tables.lock().unwrap().insert(table.to_string(), rows);
    }

    pub fn log(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn methods_for(&self, table: &str) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|r| r.table == table)
            .map(|r| r.method)
            .collect()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// `get` also answers HEAD; the method extractor tells them apart.
async fn rest_table(
    State(mock): State<Arc<MockRowStore>>,
    method: Method,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    mock.log.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        table: table.clone(),
        query: query.clone(),
        prefer: header(&headers, "prefer"),
        apikey: header(&headers, "apikey"),
        bearer: header(&headers, "authorization"),
    });

    if header(&headers, "apikey").as_deref() != Some(ANON_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid API key" })),
        )
            .into_response();
    }

    let mut tables = mock.tables.lock().unwrap();
    let Some(rows) = tables.get_mut(&table) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("relation \"public.{}\" does not exist", table) })),
        )
            .into_response();
    };

    match method {
        Method::HEAD => StatusCode::OK.into_response(),
        Method::GET => {
            let mut sorted = rows.clone();
            sorted.sort_by_key(|r| r.get("id").and_then(|v| v.as_i64()).unwrap_or(0));
            Json(sorted).into_response()
        }
        Method::DELETE => {
            rows.retain(|r| r.get("id").and_then(|v| v.as_i64()) == Some(0));
            StatusCode::NO_CONTENT.into_response()
        }
        Method::POST => {
            if mock.fail_inserts.load(Ordering::SeqCst) {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "column \"bogus\" does not exist" })),
                )
                    .into_response();
            }
            match serde_json::from_slice::<Vec<JsonValue>>(&body) {
                Ok(new_rows) => {
                    rows.extend(new_rows);
                    StatusCode::CREATED.into_response()
                }
                Err(e) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": e.to_string() })),
                )
                    .into_response(),
            }
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

pub async fn spawn_row_store(mock: Arc<MockRowStore>) -> String {
    let router = Router::new()
        .route(
            "/rest/v1/:table",
            get(rest_table).delete(rest_table).post(rest_table),
        )
        .with_state(mock);
    serve(router).await
}
