//! Persistence coordinator: the single entry point for loading and saving collections.
//!
//! Every save lands in the local cache immediately. The remote write is debounced per
//! collection: a save records the latest payload as pending and restarts that
//! collection's timer, so a burst of saves collapses into one remote write carrying the
//! last value. `flush` cancels the timers and writes everything pending right away.
//!
//! Remote writes of one collection are serialized by a per-kind lock. A writer claims
//! the pending payload only once it holds the lock, so writes land in save order and
//! the last one always carries the newest value.
//!
//! A failed remote write is reported, not retried. Its payload stays queued (without a
//! timer) unless a newer save replaced it, so the next `flush` picks it up.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::app::error::FlushError;
use crate::domain::model::CollectionKind;
use crate::storage::local_cache::{self, LocalCache};
use crate::storage::{ActiveBackend, BackendKind, RemoteBackend, StoreError};

pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_secs(30);

/// Remote-write state of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WriteState {
    /// Nothing waiting to be written.
    Idle,
    /// A debounce timer is running.
    PendingWrite,
    /// A remote write is in flight.
    Writing,
    /// The last remote write failed; the payload waits for an explicit flush.
    Unsynced,
}

struct PendingWrite {
    payload: JsonValue,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct WriteQueue {
    pending: HashMap<CollectionKind, PendingWrite>,
    /// Writers per kind that hold or are waiting on that kind's write lock.
    in_flight: HashMap<CollectionKind, usize>,
    next_generation: u64,
}

impl WriteQueue {
    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn enter_writer(&mut self, kind: CollectionKind) {
        *self.in_flight.entry(kind).or_insert(0) += 1;
    }

    fn leave_writer(&mut self, kind: CollectionKind) {
        if let Some(count) = self.in_flight.get_mut(&kind) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(&kind);
            }
        }
    }

    /// Claims the pending payload for `kind`, cancelling its timer. With
    /// `generation` set, only a payload from that exact save is claimed.
    fn claim(&mut self, kind: CollectionKind, generation: Option<u64>) -> Option<JsonValue> {
        match (self.pending.get(&kind), generation) {
            (None, _) => return None,
            (Some(p), Some(g)) if p.generation != g => return None,
            _ => {}
        }
        let pending = self.pending.remove(&kind)?;
        if let Some(timer) = pending.timer {
            timer.abort();
        }
        Some(pending.payload)
    }
}

pub struct PersistenceCoordinator {
    backend_kind: BackendKind,
    remote: Option<Arc<dyn RemoteBackend>>,
    cache: Arc<dyn LocalCache>,
    save_delay: Duration,
    /// Only ever locked for short synchronous sections, never across an await.
    queue: Mutex<WriteQueue>,
    /// One per kind, indexed by `CollectionKind as usize`.
    write_locks: [AsyncMutex<()>; 5],
}

impl PersistenceCoordinator {
    pub fn new(active: ActiveBackend, cache: Arc<dyn LocalCache>, save_delay: Duration) -> Self {
        Self {
            backend_kind: active.kind,
            remote: active.client,
            cache,
            save_delay,
            queue: Mutex::new(WriteQueue::default()),
            write_locks: Default::default(),
        }
    }

    pub fn cache_only(cache: Arc<dyn LocalCache>) -> Self {
        Self::new(ActiveBackend::cache_only(), cache, DEFAULT_SAVE_DELAY)
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend_kind
    }

    pub fn save_delay(&self) -> Duration {
        self.save_delay
    }

    fn write_lock(&self, kind: CollectionKind) -> &AsyncMutex<()> {
        &self.write_locks[kind as usize]
    }

    /// Asks the active remote backend whether it is reachable. Always false in cache-only mode.
    pub async fn remote_available(&self) -> bool {
        match &self.remote {
            Some(remote) => remote.is_available().await,
            None => false,
        }
    }

    fn queue(&self) -> MutexGuard<'_, WriteQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads a collection: remote first, then the local cache, then `fallback`.
    ///
    /// Never fails. A remote hit refreshes the cache.
    pub async fn load<T>(&self, kind: CollectionKind, fallback: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(remote) = &self.remote {
            match remote.read(kind).await {
                Ok(Some(value)) => match serde_json::from_value::<T>(value) {
                    Ok(parsed) => {
                        local_cache::write_json(self.cache.as_ref(), kind.key(), &parsed);
                        debug!(%kind, backend = remote.name(), "loaded from remote");
                        return parsed;
                    }
                    Err(e) => {
                        warn!(%kind, backend = remote.name(), error = %e, "remote collection has an unexpected shape");
                    }
                },
                Ok(None) => debug!(%kind, backend = remote.name(), "nothing stored remotely"),
                Err(e) => warn!(%kind, backend = remote.name(), error = %e, "remote load failed"),
            }
        }

        if let Some(cached) = local_cache::read_json::<T>(self.cache.as_ref(), kind.key()) {
            debug!(%kind, "loaded from local cache");
            return cached;
        }

        debug!(%kind, "using built-in defaults");
        fallback
    }

    /// Saves a collection.
    ///
    /// The local cache is written before this returns. The remote write is scheduled
    /// after the debounce delay, replacing any write already pending for `kind`.
    /// Must be called from within a Tokio runtime when a remote backend is active.
    pub fn save<T>(self: &Arc<Self>, kind: CollectionKind, collection: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(collection)?;
        self.cache.set(kind.key(), &payload.to_string());

        if self.remote.is_none() {
            debug!(%kind, "saved to local cache (no remote backend)");
            return Ok(());
        }

        let mut queue = self.queue();
        let generation = queue.bump_generation();
        let timer = self.spawn_timer(kind, generation);
        let previous = queue.pending.insert(
            kind,
            PendingWrite {
                payload,
                generation,
                timer: Some(timer),
            },
        );
        if let Some(timer) = previous.and_then(|p| p.timer) {
            timer.abort();
        }
        debug!(%kind, delay_secs = self.save_delay.as_secs(), "remote write scheduled");
        Ok(())
    }

    fn spawn_timer(self: &Arc<Self>, kind: CollectionKind, generation: u64) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let delay = self.save_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // A newer save or a flush may have claimed the payload while we slept.
            {
                let mut queue = coordinator.queue();
                match queue.pending.get_mut(&kind) {
                    Some(p) if p.generation == generation => {
                        p.timer = None;
                        queue.enter_writer(kind);
                    }
                    _ => return,
                }
            }

            // The write runs in its own task: aborting a timer must never cut a
            // write short after its payload has been claimed.
            let writer = Arc::clone(&coordinator);
            tokio::spawn(async move {
                if let Err(e) = writer.write_kind(kind, Some(generation)).await {
                    error!(%kind, error = %e, "debounced remote write failed; local cache keeps the latest value");
                }
            });
        })
    }

    /// Runs one serialized remote write for `kind`. The caller must have registered
    /// itself with `enter_writer`; this releases that registration.
    ///
    /// Waits for any write of the same kind already running, then claims the pending
    /// payload. Nothing to claim is a success. On failure the payload is re-queued
    /// unless a newer save has replaced it in the meantime.
    async fn write_kind(
        &self,
        kind: CollectionKind,
        generation: Option<u64>,
    ) -> Result<(), StoreError> {
        let _serialized = self.write_lock(kind).lock().await;

        let claimed = self.queue().claim(kind, generation);
        let result = match (&self.remote, &claimed) {
            (Some(remote), Some(payload)) => remote.write(kind, payload).await,
            _ => Ok(()),
        };

        let mut queue = self.queue();
        queue.leave_writer(kind);
        if let Some(payload) = claimed {
            match &result {
                Ok(()) => info!(%kind, backend = %self.backend_kind, "synced to remote"),
                Err(_) => {
                    let generation = queue.bump_generation();
                    queue.pending.entry(kind).or_insert(PendingWrite {
                        payload,
                        generation,
                        timer: None,
                    });
                }
            }
        }
        result
    }

    /// Cancels all debounce timers and writes every pending collection now.
    ///
    /// Also waits for writes already in flight, so once this resolves every value
    /// saved before the call has either reached the remote or is reported failed.
    pub async fn flush(self: &Arc<Self>) -> Result<(), FlushError> {
        let kinds: Vec<CollectionKind> = {
            let mut queue = self.queue();
            let mut kinds: Vec<CollectionKind> = queue
                .pending
                .keys()
                .chain(queue.in_flight.keys())
                .copied()
                .collect();
            kinds.sort();
            kinds.dedup();
            for kind in &kinds {
                // Timers must not fire a second write after the flush.
                if let Some(timer) = queue.pending.get_mut(kind).and_then(|p| p.timer.take()) {
                    timer.abort();
                }
                queue.enter_writer(*kind);
            }
            kinds
        };

        if kinds.is_empty() {
            debug!("flush: nothing pending");
            return Ok(());
        }

        info!(count = kinds.len(), "flushing pending writes");
        let handles: Vec<(CollectionKind, JoinHandle<Result<(), StoreError>>)> = kinds
            .into_iter()
            .map(|kind| {
                let coordinator = Arc::clone(self);
                let handle = tokio::spawn(async move { coordinator.write_kind(kind, None).await });
                (kind, handle)
            })
            .collect();

        let mut failures = Vec::new();
        for (kind, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push((kind, e.to_string())),
                Err(e) => failures.push((kind, format!("write task failed: {}", e))),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            let err = FlushError { failures };
            error!(error = %err, "flush incomplete");
            Err(err)
        }
    }

    pub fn write_state(&self, kind: CollectionKind) -> WriteState {
        let queue = self.queue();
        if queue.in_flight.contains_key(&kind) {
            return WriteState::Writing;
        }
        match queue.pending.get(&kind) {
            Some(p) if p.timer.is_some() => WriteState::PendingWrite,
            Some(_) => WriteState::Unsynced,
            None => WriteState::Idle,
        }
    }

    /// Collections with a payload not yet written remotely.
    pub fn pending_kinds(&self) -> Vec<CollectionKind> {
        let queue = self.queue();
        let mut kinds: Vec<CollectionKind> = queue.pending.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn has_pending(&self) -> bool {
        !self.queue().pending.is_empty()
    }
}
