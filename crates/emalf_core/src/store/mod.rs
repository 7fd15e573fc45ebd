//! Idea store contract and its backends.
//!
//! # Responsibility
//! - Define the one narrow contract every UI caller talks to.
//! - Keep SQL, file and HTTP details inside their own backend module.
//!
//! # Invariants
//! - Every backend trims input and enforces exact-match uniqueness on `add`.
//! - Infrastructure failures surface as `StoreError::StorageUnavailable`.

pub mod http_store;
pub mod idea_store;
pub mod local_storage;
pub mod local_store;
pub mod sqlite_store;
