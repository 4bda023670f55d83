//! Row-store backend: each collection is a table behind a PostgREST endpoint.
//!
//! Writes are not upserts. The table is emptied and the given snapshot is
//! inserted, so removals and reorders come out right. The two requests are not
//! atomic: if the insert fails after the delete succeeded the table stays empty
//! until the next successful save of that collection.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use super::{error_from_response, RemoteBackend, StoreError};
use crate::domain::model::CollectionKind;
use crate::infra::config::RowStoreConfig;

const BACKEND: &str = "row_store";
const CHECK_TABLE: &str = "cats";

pub struct RowStore {
    client: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl RowStore {
    pub fn new(config: RowStoreConfig) -> Result<Self, StoreError> {
        if config.url.is_empty() || config.anon_key.is_empty() {
            return Err(StoreError::Config(
                "row store URL and anon key must not be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            anon_key: config.anon_key,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(BACKEND, response).await);
        }
        Ok(response)
    }

    /// All rows, ascending by id.
    pub async fn select_all(&self, table: &str) -> Result<Vec<JsonValue>, StoreError> {
        let response = Self::send(
            self.request(Method::GET, table)
                .query(&[("select", "*"), ("order", "id.asc")]),
        )
        .await?;
        Ok(response.json::<Vec<JsonValue>>().await?)
    }

    pub async fn delete_all(&self, table: &str) -> Result<(), StoreError> {
        Self::send(self.request(Method::DELETE, table).query(&[("id", "neq.0")])).await?;
        Ok(())
    }

    pub async fn insert(&self, table: &str, rows: &[JsonValue]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        Self::send(
            self.request(Method::POST, table)
                .header("Prefer", "return=minimal")
                .json(rows),
        )
        .await?;
        Ok(())
    }

    /// Delete-all then insert. See the module docs for the failure window.
    pub async fn replace_all(&self, table: &str, rows: &[JsonValue]) -> Result<(), StoreError> {
        self.delete_all(table).await?;
        if let Err(e) = self.insert(table, rows).await {
            warn!(table, error = %e, "insert failed after delete; remote table is empty until the next save");
            return Err(e);
        }
        debug!(table, rows = rows.len(), "replaced table contents");
        Ok(())
    }

    /// Row-count check without fetching rows.
    pub async fn check_table(&self, table: &str) -> Result<(), StoreError> {
        Self::send(
            self.request(Method::HEAD, table)
                .query(&[("select", "id")])
                .header("Prefer", "count=exact"),
        )
        .await?;
        Ok(())
    }

    /// Keep-alive: checks each table in turn and returns the first that answers.
    pub async fn ping(&self, tables: &[&str]) -> Option<String> {
        for table in tables {
            match self.check_table(table).await {
                Ok(()) => {
                    info!(table, "row store answered keep-alive check");
                    return Some(table.to_string());
                }
                Err(e) => warn!(table, error = %e, "keep-alive check failed"),
            }
        }
        None
    }
}

#[async_trait]
impl RemoteBackend for RowStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn read(&self, kind: CollectionKind) -> Result<Option<JsonValue>, StoreError> {
        let rows = self.select_all(kind.table_name()).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(JsonValue::Array(rows)))
    }

    async fn write(&self, kind: CollectionKind, collection: &JsonValue) -> Result<(), StoreError> {
        let rows = collection.as_array().ok_or_else(|| {
            StoreError::Decode(format!("{} must be serialized as an array of rows", kind))
        })?;
        self.replace_all(kind.table_name(), rows).await
    }

    async fn is_available(&self) -> bool {
        self.check_table(CHECK_TABLE).await.is_ok()
    }
}
