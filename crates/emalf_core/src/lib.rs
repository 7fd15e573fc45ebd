//! Core domain logic for EmalfDraw.
//! This crate is the single source of truth for idea-pool invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod picker;
pub mod seed;
pub mod store;
pub mod transition;
pub mod widget;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::idea::{normalize_idea_text, Idea, IdeaId, IdeaValidationError, MAX_IDEA_CHARS};
pub use picker::ChallengePicker;
pub use seed::DEFAULT_IDEAS;
pub use store::http_store::HttpIdeaStore;
pub use store::idea_store::{IdeaStore, StoreError, StoreResult};
pub use store::local_storage::{LocalStorage, LocalStorageError};
pub use store::local_store::{LocalIdeaStore, LOCAL_IDEAS_KEY};
pub use store::sqlite_store::SqliteIdeaStore;
pub use transition::{Transition, TRANSITION_DELAY};
pub use widget::{Toast, ToastVariant, Widget, WidgetState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
