use thiserror::Error;

use crate::domain::model::CollectionKind;
use crate::storage::StoreError;

/// One or more remote writes failed during a flush. The local cache still holds
/// every value, and the failed payloads stay queued for the next flush.
#[derive(Debug, Error)]
#[error("changes saved locally but not synced: {}", summarize(.failures))]
pub struct FlushError {
    pub failures: Vec<(CollectionKind, String)>,
}

impl FlushError {
    pub fn failed_kinds(&self) -> Vec<CollectionKind> {
        self.failures.iter().map(|(k, _)| *k).collect()
    }

    pub fn failures_summary(&self) -> String {
        summarize(&self.failures)
    }
}

fn summarize(failures: &[(CollectionKind, String)]) -> String {
    failures
        .iter()
        .map(|(kind, err)| format!("{} ({})", kind, err))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: CollectionKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid snapshot document: {0}")]
    InvalidSnapshot(#[source] serde_json::Error),
    #[error("record {id} not found in {kind}")]
    RecordNotFound { kind: CollectionKind, id: i64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}
