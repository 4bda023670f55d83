//! Application state: the canonical in-memory copy of every collection.
//!
//! Saves are gated on readiness. Until the startup load has resolved all five
//! collections, replacements only touch memory, so built-in defaults can never be
//! written over real remote data during the load race.

use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::app::coordinator::PersistenceCoordinator;
use crate::app::error::ContentError;
use crate::domain::model::{with_collection, Collection, CollectionKind, Collections};
use crate::storage::StoreError;

pub struct ContentState {
    coordinator: Arc<PersistenceCoordinator>,
    collections: RwLock<Collections>,
    ready: AtomicBool,
}

impl ContentState {
    /// A holder showing `initial` that has not loaded anything yet.
    pub fn new(coordinator: Arc<PersistenceCoordinator>, initial: Collections) -> Self {
        Self {
            coordinator,
            collections: RwLock::new(initial),
            ready: AtomicBool::new(false),
        }
    }

    /// Loads every collection through the coordinator and returns a ready holder.
    pub async fn bootstrap(
        coordinator: Arc<PersistenceCoordinator>,
        defaults: Collections,
    ) -> Arc<Self> {
        let state = Arc::new(Self::new(coordinator, defaults.clone()));
        state.load_all(defaults).await;
        state
    }

    /// Resolves all five collections (remote, cache, or `defaults`) and marks the
    /// holder ready.
    pub async fn load_all(&self, defaults: Collections) {
        let c = &self.coordinator;
        let (cats, testimonials, services, about_gallery, facility_gallery) = tokio::join!(
            c.load(CollectionKind::Cats, defaults.cats),
            c.load(CollectionKind::Testimonials, defaults.testimonials),
            c.load(CollectionKind::Services, defaults.services),
            c.load(CollectionKind::AboutGallery, defaults.about_gallery),
            c.load(CollectionKind::FacilityGallery, defaults.facility_gallery),
        );

        let loaded = Collections {
            cats,
            testimonials,
            services,
            about_gallery,
            facility_gallery,
        };
        for kind in CollectionKind::ALL {
            info!(%kind, records = loaded.len_of(kind), "collection loaded");
        }

        *self.collections.write().await = loaded;
        self.ready.store(true, Ordering::SeqCst);
        info!(backend = %self.coordinator.backend_kind(), "content ready");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn coordinator(&self) -> &Arc<PersistenceCoordinator> {
        &self.coordinator
    }

    pub async fn collections(&self) -> Collections {
        self.collections.read().await.clone()
    }

    pub async fn get<C: Collection>(&self) -> Vec<C::Item> {
        C::items(&*self.collections.read().await).clone()
    }

    /// Replaces a whole collection. Once ready this issues exactly one save.
    pub async fn replace<C: Collection>(&self, items: Vec<C::Item>) -> Result<(), StoreError> {
        self.modify::<C>(move |current| {
            *current = items;
            true
        })
        .await
        .map(|_| ())
    }

    /// Read-modify-write of one collection under a single lock. `f` returns whether it
    /// changed anything; unchanged collections are not saved.
    pub async fn modify<C: Collection>(
        &self,
        f: impl FnOnce(&mut Vec<C::Item>) -> bool,
    ) -> Result<bool, StoreError> {
        let mut guard = self.collections.write().await;
        let changed = f(C::items_mut(&mut guard));
        if changed && self.is_ready() {
            self.coordinator.save(C::KIND, C::items(&guard))?;
        }
        Ok(changed)
    }

    /// One collection as JSON, for callers that only know the kind at runtime.
    pub async fn get_value(&self, kind: CollectionKind) -> Result<JsonValue, StoreError> {
        let guard = self.collections.read().await;
        let value = with_collection!(kind, C => serde_json::to_value(C::items(&guard)))?;
        Ok(value)
    }

    /// Replaces a collection from JSON. The payload must match the record shape.
    pub async fn replace_value(&self, kind: CollectionKind, value: JsonValue) -> Result<(), ContentError> {
        with_collection!(kind, C => {
            let items = serde_json::from_value::<Vec<<C as Collection>::Item>>(value)
                .map_err(|source| ContentError::InvalidPayload { kind, source })?;
            self.replace::<C>(items).await?;
        });
        Ok(())
    }
}
