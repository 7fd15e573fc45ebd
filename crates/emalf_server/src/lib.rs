//! HTTP surface for the shared EmalfDraw idea pool.
//!
//! # Responsibility
//! - Expose list/random/create idea operations under `/api`.
//! - Keep transport concerns out of `emalf_core`.

pub mod config;
pub mod cors;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use cors::CorsPolicy;
pub use router::{handle, ApiResponse, Method};
pub use server::{ApiServer, ServerError};
