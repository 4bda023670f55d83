pub mod admin;
pub mod content_state;
pub mod coordinator;
pub mod editor;
pub mod error;

pub use content_state::ContentState;
pub use coordinator::{PersistenceCoordinator, WriteState};
pub use error::{ContentError, FlushError};
