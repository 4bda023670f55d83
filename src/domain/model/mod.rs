//! Domain model for the persisted site content.
//!
//! The persistence layer only ever moves whole collections around, so the
//! record types here are loosely validated: serde shapes, nothing more.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub mod age;
pub mod collections;
pub mod defaults;
pub mod records;

pub(crate) use collections::with_collection;
pub use collections::{
    AboutGallery, Cats, Collection, Collections, FacilityGallery, Services, Testimonials,
};
pub use records::{Cat, GalleryItem, Gender, Record, Service, Testimonial};

/// The five named collections. Each one is persisted as a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    Cats,
    Testimonials,
    Services,
    AboutGallery,
    FacilityGallery,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::Cats,
        CollectionKind::Testimonials,
        CollectionKind::Services,
        CollectionKind::AboutGallery,
        CollectionKind::FacilityGallery,
    ];

    /// Local cache key, also the type name used in commit messages.
    pub fn key(self) -> &'static str {
        match self {
            CollectionKind::Cats => "cats",
            CollectionKind::Testimonials => "testimonials",
            CollectionKind::Services => "services",
            CollectionKind::AboutGallery => "aboutGallery",
            CollectionKind::FacilityGallery => "facilityGallery",
        }
    }

    /// Table name in the row store.
    pub fn table_name(self) -> &'static str {
        match self {
            CollectionKind::Cats => "cats",
            CollectionKind::Testimonials => "testimonials",
            CollectionKind::Services => "services",
            CollectionKind::AboutGallery => "about_gallery",
            CollectionKind::FacilityGallery => "facility_gallery",
        }
    }

    /// File path inside the content repository.
    pub fn repo_path(self) -> String {
        format!("data/{}.json", self.key())
    }

    /// Accepts either the cache key or the table name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.key() == name || k.table_name() == name)
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Identifier for a newly created record: the current Unix time in milliseconds.
pub fn next_record_id() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
