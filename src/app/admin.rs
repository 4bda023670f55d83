//! Admin-facing operations: snapshot export/import and the manual "save now".

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::app::content_state::ContentState;
use crate::app::error::ContentError;
use crate::domain::model::{
    AboutGallery, Cat, Cats, CollectionKind, FacilityGallery, GalleryItem, Service, Services,
    Testimonial, Testimonials,
};
use crate::storage::BackendKind;

/// Backup document holding every collection.
///
/// On import, absent collections are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cats: Option<Vec<Cat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_gallery: Option<Vec<GalleryItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_gallery: Option<Vec<GalleryItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
}

pub async fn export_snapshot(state: &ContentState) -> Snapshot {
    let all = state.collections().await;
    Snapshot {
        cats: Some(all.cats),
        testimonials: Some(all.testimonials),
        services: Some(all.services),
        about_gallery: Some(all.about_gallery),
        facility_gallery: Some(all.facility_gallery),
        export_date: Some(Utc::now().to_rfc3339()),
    }
}

/// Download name for a snapshot taken on `date`.
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("cats-and-cozy-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Parses a snapshot document and replaces every collection it contains.
///
/// The whole document is parsed before anything changes, so a malformed file
/// leaves the state as it was. Returns the collections that were replaced.
pub async fn import_snapshot(
    state: &ContentState,
    raw: &str,
) -> Result<Vec<CollectionKind>, ContentError> {
    let snapshot: Snapshot = serde_json::from_str(raw).map_err(ContentError::InvalidSnapshot)?;
    import(state, snapshot).await
}

pub async fn import(
    state: &ContentState,
    snapshot: Snapshot,
) -> Result<Vec<CollectionKind>, ContentError> {
    let mut replaced = Vec::new();
    if let Some(items) = snapshot.cats {
        state.replace::<Cats>(items).await?;
        replaced.push(CollectionKind::Cats);
    }
    if let Some(items) = snapshot.testimonials {
        state.replace::<Testimonials>(items).await?;
        replaced.push(CollectionKind::Testimonials);
    }
    if let Some(items) = snapshot.services {
        state.replace::<Services>(items).await?;
        replaced.push(CollectionKind::Services);
    }
    if let Some(items) = snapshot.about_gallery {
        state.replace::<AboutGallery>(items).await?;
        replaced.push(CollectionKind::AboutGallery);
    }
    if let Some(items) = snapshot.facility_gallery {
        state.replace::<FacilityGallery>(items).await?;
        replaced.push(CollectionKind::FacilityGallery);
    }
    info!(collections = replaced.len(), "snapshot imported");
    Ok(replaced)
}

/// Outcome of a manual flush as shown to the admin.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FlushReport {
    pub backend: BackendKind,
    /// Always true: every save hits the local cache first.
    pub saved_locally: bool,
    pub synced: bool,
    pub message: String,
}

pub async fn manual_flush(state: &ContentState) -> FlushReport {
    let coordinator = state.coordinator();
    let backend = coordinator.backend_kind();
    let (synced, message) = match coordinator.flush().await {
        Ok(()) if backend == BackendKind::CacheOnly => (
            false,
            "Changes saved locally; no remote backend is configured".to_string(),
        ),
        Ok(()) => (true, format!("All changes saved and synced to {}", backend)),
        Err(e) => (
            false,
            format!(
                "Changes saved locally but not synced to {}: {}",
                backend,
                e.failures_summary()
            ),
        ),
    };
    FlushReport {
        backend,
        saved_locally: true,
        synced,
        message,
    }
}
