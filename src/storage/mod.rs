//! Remote backends and the local cache.
//!
//! Both remote backends speak whole collections: a read returns the entire
//! collection (or `None` when nothing has been stored yet), a write replaces it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::model::CollectionKind;
use crate::infra::config::AppConfig;

pub mod github;
pub mod local_cache;
pub mod row_store;

pub use github::GitHubStore;
pub use local_cache::{FileCache, LocalCache, MemoryCache};
pub use row_store::RowStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{backend} returned HTTP {status}: {message}")]
    Http {
        backend: &'static str,
        status: u16,
        message: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode remote payload: {0}")]
    Decode(String),
    #[error("could not serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid backend configuration: {0}")]
    Config(String),
}

/// A remote system holding replicas of the collections.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Short name for logs and status output.
    fn name(&self) -> &'static str;

    /// Reads a whole collection. `Ok(None)` means nothing is stored yet.
    async fn read(&self, kind: CollectionKind) -> Result<Option<JsonValue>, StoreError>;

    /// Replaces a whole collection.
    async fn write(&self, kind: CollectionKind, collection: &JsonValue) -> Result<(), StoreError>;

    /// Cheap reachability check.
    async fn is_available(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    RowStore,
    GitHub,
    CacheOnly,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::RowStore => "row store",
            BackendKind::GitHub => "GitHub",
            BackendKind::CacheOnly => "local cache only",
        })
    }
}

/// The backend chosen for the session.
#[derive(Clone)]
pub struct ActiveBackend {
    pub kind: BackendKind,
    pub client: Option<Arc<dyn RemoteBackend>>,
}

impl ActiveBackend {
    pub fn remote(kind: BackendKind, client: Arc<dyn RemoteBackend>) -> Self {
        Self {
            kind,
            client: Some(client),
        }
    }

    pub fn cache_only() -> Self {
        Self {
            kind: BackendKind::CacheOnly,
            client: None,
        }
    }
}

/// Picks the backend for this session. Evaluated once, at startup.
///
/// The row store wins when it answers its reachability check; otherwise GitHub is used when
/// credentials are configured; otherwise writes stay in the local cache.
pub async fn select_backend(config: &AppConfig) -> ActiveBackend {
    if let Some(row_config) = &config.row_store {
        match RowStore::new(row_config.clone()) {
            Ok(store) => {
                if store.is_available().await {
                    info!(url = %row_config.url, "using row store backend");
                    return ActiveBackend::remote(BackendKind::RowStore, Arc::new(store));
                }
                warn!(url = %row_config.url, "row store configured but not reachable");
            }
            Err(e) => warn!(error = %e, "could not build row store client"),
        }
    }

    if let Some(github_config) = &config.github {
        match GitHubStore::new(github_config.clone()) {
            Ok(store) => {
                info!(
                    owner = %github_config.owner,
                    repo = %github_config.repo,
                    branch = %github_config.branch,
                    "using GitHub backend"
                );
                return ActiveBackend::remote(BackendKind::GitHub, Arc::new(store));
            }
            Err(e) => warn!(error = %e, "could not build GitHub client"),
        }
    }

    info!("no remote backend configured, running on the local cache only");
    ActiveBackend::cache_only()
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turns a non-success response into a [`StoreError::Http`], preferring the
/// API's own `message` field over the raw body.
pub(crate) async fn error_from_response(
    backend: &'static str,
    response: reqwest::Response,
) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            } else {
                body
            }
        });
    StoreError::Http {
        backend,
        status: status.as_u16(),
        message,
    }
}
