//! Idea store backed by the remote `/api/ideas` endpoints.
//!
//! # Invariants
//! - Input is normalized locally before any request is sent.
//! - HTTP statuses map back onto the shared `StoreError` taxonomy:
//!   400/422 → `Validation`, 409 → `DuplicateIdea`, 404 on the random
//!   endpoint → `EmptyStore`, everything else → `StorageUnavailable`.

use crate::model::idea::{normalize_idea_text, Idea, IdeaValidationError};
use crate::model::wire::{CreateIdeaRequest, ErrorBody, IdeaPayload, API_PREFIX};
use crate::store::idea_store::{IdeaStore, StoreError, StoreResult};
use log::warn;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::StorageUnavailable(value.to_string())
    }
}

/// Blocking HTTP client for a remote idea pool.
#[derive(Debug, Clone)]
pub struct HttpIdeaStore {
    client: Client,
    base_url: String,
}

impl HttpIdeaStore {
    /// Creates a client for the server rooted at `base_url`
    /// (for example `http://127.0.0.1:8001`).
    pub fn new(base_url: impl Into<String>) -> StoreResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }
}

impl IdeaStore for HttpIdeaStore {
    fn list_all(&mut self) -> StoreResult<Vec<Idea>> {
        let response = self.client.get(self.endpoint("/ideas")).send()?;
        let payloads: Vec<IdeaPayload> = decode(response, Endpoint::List)?;
        Ok(payloads.into_iter().map(Idea::from).collect())
    }

    fn pick_random(&mut self) -> StoreResult<Idea> {
        let response = self.client.get(self.endpoint("/ideas/random")).send()?;
        let payload: IdeaPayload = decode(response, Endpoint::Random)?;
        Ok(payload.into())
    }

    fn add(&mut self, text: &str) -> StoreResult<Idea> {
        let text = normalize_idea_text(text)?;
        let response = self
            .client
            .post(self.endpoint("/ideas"))
            .json(&CreateIdeaRequest { text: text.clone() })
            .send()?;
        let payload: IdeaPayload = decode(response, Endpoint::Create { text: &text })?;
        Ok(payload.into())
    }
}

enum Endpoint<'a> {
    List,
    Random,
    Create { text: &'a str },
}

fn decode<T: DeserializeOwned>(response: Response, endpoint: Endpoint<'_>) -> StoreResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }

    let detail = response
        .json::<ErrorBody>()
        .map(|body| body.detail)
        .unwrap_or_else(|_| status.to_string());

    let err = match (status, endpoint) {
        (StatusCode::NOT_FOUND, Endpoint::Random) => StoreError::EmptyStore,
        (StatusCode::CONFLICT, Endpoint::Create { text }) => {
            StoreError::DuplicateIdea(text.to_string())
        }
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, Endpoint::Create { .. }) => {
            StoreError::Validation(IdeaValidationError::Rejected(detail))
        }
        (status, _) => {
            warn!(
                "event=remote_request module=http_store status=error http_status={}",
                status.as_u16()
            );
            StoreError::StorageUnavailable(format!("HTTP {}: {detail}", status.as_u16()))
        }
    };
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::HttpIdeaStore;

    #[test]
    fn base_url_drops_trailing_slashes() {
        let store = HttpIdeaStore::new("http://127.0.0.1:8001//").unwrap();
        assert_eq!(store.base_url(), "http://127.0.0.1:8001");
        assert_eq!(
            store.endpoint("/ideas/random"),
            "http://127.0.0.1:8001/api/ideas/random"
        );
    }
}
