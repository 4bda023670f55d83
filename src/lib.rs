pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ContentState, PersistenceCoordinator, WriteState};
pub use domain::model::{CollectionKind, Collections};
pub use infra::config::AppConfig;
pub use storage::{select_backend, ActiveBackend, BackendKind, LocalCache, RemoteBackend, StoreError};
