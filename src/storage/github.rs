//! Commit-based backend: each collection is a JSON file in a GitHub repository.
//!
//! Reads go through the contents API (base64 body plus the blob sha). Writes are
//! whole-file create-or-update PUTs; updating an existing file must name its
//! current sha or GitHub rejects the request.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Local;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::{error_from_response, RemoteBackend, StoreError};
use crate::domain::model::CollectionKind;
use crate::infra::config::GitHubConfig;

const BACKEND: &str = "github";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("cozy-store/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ContentResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

pub struct GitHubStore {
    client: reqwest::Client,
    config: GitHubConfig,
    repo_url: String,
}

impl GitHubStore {
    pub fn new(config: GitHubConfig) -> Result<Self, StoreError> {
        if config.owner.is_empty() || config.repo.is_empty() {
            return Err(StoreError::Config(
                "GitHub owner and repo must not be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let repo_url = format!(
            "{}/repos/{}/{}",
            config.api_url.trim_end_matches('/'),
            config.owner,
            config.repo
        );
        Ok(Self {
            client,
            config,
            repo_url,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("token {}", self.config.token))
            .header(ACCEPT, GITHUB_ACCEPT)
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/contents/{}", self.repo_url, path.trim_start_matches('/'))
    }

    async fn fetch_file(&self, path: &str) -> Result<Option<ContentResponse>, StoreError> {
        let response = self
            .authorized(self.client.get(self.contents_url(path)))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(path, "file not found in repository");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(BACKEND, response).await);
        }
        Ok(Some(response.json::<ContentResponse>().await?))
    }

    /// Reads and parses a JSON file. A missing file is `Ok(None)`.
    pub async fn read_json(&self, path: &str) -> Result<Option<JsonValue>, StoreError> {
        match self.fetch_file(path).await? {
            Some(file) => decode_content(&file.content).map(Some),
            None => Ok(None),
        }
    }

    /// Current blob sha of a file, `None` when it does not exist yet.
    pub async fn file_sha(&self, path: &str) -> Result<Option<String>, StoreError> {
        Ok(self.fetch_file(path).await?.map(|f| f.sha))
    }

    /// Creates or replaces a file with the pretty-printed JSON of `value`.
    pub async fn write_json(
        &self,
        path: &str,
        value: &JsonValue,
        message: &str,
    ) -> Result<(), StoreError> {
        let sha = self.file_sha(path).await?;
        let body = PutContentRequest {
            message,
            content: encode_content(value)?,
            branch: &self.config.branch,
            sha,
        };

        let response = self
            .authorized(self.client.put(self.contents_url(path)))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            let err = error_from_response(BACKEND, response).await;
            warn!(path, error = %err, "GitHub write rejected");
            return Err(err);
        }
        Ok(())
    }

    /// Checks that the repository itself is reachable with the configured token.
    pub async fn test_connection(&self) -> bool {
        match self.authorized(self.client.get(&self.repo_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "GitHub connection test failed");
                false
            }
        }
    }
}

#[async_trait]
impl RemoteBackend for GitHubStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn read(&self, kind: CollectionKind) -> Result<Option<JsonValue>, StoreError> {
        self.read_json(&kind.repo_path()).await
    }

    async fn write(&self, kind: CollectionKind, collection: &JsonValue) -> Result<(), StoreError> {
        self.write_json(&kind.repo_path(), collection, &commit_message(kind))
            .await
    }

    async fn is_available(&self) -> bool {
        self.test_connection().await
    }
}

pub fn commit_message(kind: CollectionKind) -> String {
    format!("Update {} - {}", kind.key(), Local::now().format("%Y-%m-%d %H:%M:%S"))
}

// GitHub wraps base64 bodies at 60 columns.
fn decode_content(raw: &str) -> Result<JsonValue, StoreError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::Decode(format!("invalid base64 content: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::Decode(format!("file is not valid JSON: {}", e)))
}

fn encode_content(value: &JsonValue) -> Result<String, StoreError> {
    let pretty = serde_json::to_string_pretty(value)?;
    Ok(BASE64.encode(pretty.as_bytes()))
}
