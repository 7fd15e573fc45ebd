//! Domain model for the drawing-idea pool.
//!
//! # Invariants
//! - Idea text is trimmed, non-empty and unique (exact match) within a store.
//! - Ideas are never edited or deleted once stored.

pub mod idea;
pub mod wire;
