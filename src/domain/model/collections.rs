//! The in-memory set of all five collections and typed access to each slot.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::records::{Cat, GalleryItem, Record, Service, Testimonial};
use super::CollectionKind;

/// Every collection the site persists, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    pub cats: Vec<Cat>,
    pub testimonials: Vec<Testimonial>,
    pub services: Vec<Service>,
    pub about_gallery: Vec<GalleryItem>,
    pub facility_gallery: Vec<GalleryItem>,
}

/// Typed handle on one slot of [`Collections`].
///
/// The two galleries share a record type, so the collection (not the record)
/// carries the kind.
pub trait Collection: Send + Sync + 'static {
    type Item: Record;
    const KIND: CollectionKind;

    fn items(all: &Collections) -> &Vec<Self::Item>;
    fn items_mut(all: &mut Collections) -> &mut Vec<Self::Item>;
}

macro_rules! collection {
    ($name:ident, $item:ty, $kind:expr, $field:ident) => {
        pub struct $name;

        impl Collection for $name {
            type Item = $item;
            const KIND: CollectionKind = $kind;

            fn items(all: &Collections) -> &Vec<$item> {
                &all.$field
            }

            fn items_mut(all: &mut Collections) -> &mut Vec<$item> {
                &mut all.$field
            }
        }
    };
}

collection!(Cats, Cat, CollectionKind::Cats, cats);
collection!(Testimonials, Testimonial, CollectionKind::Testimonials, testimonials);
collection!(Services, Service, CollectionKind::Services, services);
collection!(AboutGallery, GalleryItem, CollectionKind::AboutGallery, about_gallery);
collection!(FacilityGallery, GalleryItem, CollectionKind::FacilityGallery, facility_gallery);

/// Runs `$body` with `$c` bound to the [`Collection`] type matching a runtime kind.
macro_rules! with_collection {
    ($kind:expr, $c:ident => $body:expr) => {
        match $kind {
            $crate::domain::model::CollectionKind::Cats => {
                type $c = $crate::domain::model::Cats;
                $body
            }
            $crate::domain::model::CollectionKind::Testimonials => {
                type $c = $crate::domain::model::Testimonials;
                $body
            }
            $crate::domain::model::CollectionKind::Services => {
                type $c = $crate::domain::model::Services;
                $body
            }
            $crate::domain::model::CollectionKind::AboutGallery => {
                type $c = $crate::domain::model::AboutGallery;
                $body
            }
            $crate::domain::model::CollectionKind::FacilityGallery => {
                type $c = $crate::domain::model::FacilityGallery;
                $body
            }
        }
    };
}

pub(crate) use with_collection;

impl Collections {
    /// Record count of one collection.
    pub fn len_of(&self, kind: CollectionKind) -> usize {
        with_collection!(kind, C => C::items(self).len())
    }
}
