//! JSON payloads exchanged over the `/api` HTTP surface.
//!
//! Shared by the server router and the HTTP-backed store so both ends agree
//! on field names.

use super::idea::{Idea, IdeaId};
use serde::{Deserialize, Serialize};

/// Base path of every idea endpoint.
pub const API_PREFIX: &str = "/api";

/// Idea as served by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaPayload {
    pub id: IdeaId,
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub user_submitted: bool,
}

impl IdeaPayload {
    /// Returns `None` for ideas without an assigned identity.
    pub fn from_idea(idea: &Idea) -> Option<Self> {
        Some(Self {
            id: idea.id?,
            text: idea.text.clone(),
            created_at: idea.created_at_ms?,
            user_submitted: idea.user_submitted,
        })
    }
}

impl From<IdeaPayload> for Idea {
    fn from(value: IdeaPayload) -> Self {
        Self {
            id: Some(value.id),
            text: value.text,
            created_at_ms: Some(value.created_at),
            user_submitted: value.user_submitted,
        }
    }
}

/// Body of `POST /api/ideas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIdeaRequest {
    pub text: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Body of `GET /api/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthResponse {
    Healthy { database: String, ideas_count: usize },
    Unhealthy { error: String },
}
