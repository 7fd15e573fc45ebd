//! Local-only idea store persisted as a plain string array.
//!
//! # Invariants
//! - The idea list lives under [`LOCAL_IDEAS_KEY`] as a JSON array of strings.
//! - An absent key is seeded with the built-in ideas on first access.
//! - Listing order is insertion order.

use crate::model::idea::{normalize_idea_text, Idea};
use crate::picker::ChallengePicker;
use crate::seed::{is_default_idea, DEFAULT_IDEAS};
use crate::store::idea_store::{IdeaStore, StoreError, StoreResult};
use crate::store::local_storage::{LocalStorage, LocalStorageError};
use log::info;
use rand::rngs::ThreadRng;
use rand::Rng;

/// Storage key holding the serialized idea list.
pub const LOCAL_IDEAS_KEY: &str = "emalfdraw_ideas";

impl From<LocalStorageError> for StoreError {
    fn from(value: LocalStorageError) -> Self {
        Self::StorageUnavailable(value.to_string())
    }
}

/// Idea store over [`LocalStorage`]; random picks are derived client-side.
pub struct LocalIdeaStore<R = ThreadRng> {
    storage: LocalStorage,
    picker: ChallengePicker<R>,
}

impl LocalIdeaStore<ThreadRng> {
    pub fn new(storage: LocalStorage) -> Self {
        Self::with_picker(storage, ChallengePicker::from_entropy())
    }
}

impl<R: Rng> LocalIdeaStore<R> {
    pub fn with_picker(storage: LocalStorage, picker: ChallengePicker<R>) -> Self {
        Self { storage, picker }
    }

    fn load_texts(&mut self) -> StoreResult<Vec<String>> {
        match self.storage.get_item(LOCAL_IDEAS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| {
                StoreError::StorageUnavailable(format!(
                    "stored value under `{LOCAL_IDEAS_KEY}` is not a string array: {err}"
                ))
            }),
            None => {
                let defaults: Vec<String> =
                    DEFAULT_IDEAS.iter().map(|text| (*text).to_string()).collect();
                self.save_texts(&defaults)?;
                info!(
                    "event=seed_defaults module=local_store status=ok inserted={} path={}",
                    defaults.len(),
                    self.storage.path().display()
                );
                Ok(defaults)
            }
        }
    }

    fn save_texts(&self, texts: &[String]) -> StoreResult<()> {
        let encoded = serde_json::to_string(texts)
            .map_err(|err| StoreError::StorageUnavailable(err.to_string()))?;
        self.storage.set_item(LOCAL_IDEAS_KEY, encoded)?;
        Ok(())
    }
}

impl<R: Rng> IdeaStore for LocalIdeaStore<R> {
    fn list_all(&mut self) -> StoreResult<Vec<Idea>> {
        Ok(self
            .load_texts()?
            .into_iter()
            .map(|text| {
                let user_submitted = !is_default_idea(&text);
                Idea::local(text, user_submitted)
            })
            .collect())
    }

    fn pick_random(&mut self) -> StoreResult<Idea> {
        let ideas = self.list_all()?;
        self.picker
            .try_choose(&ideas)
            .cloned()
            .ok_or(StoreError::EmptyStore)
    }

    fn add(&mut self, text: &str) -> StoreResult<Idea> {
        let text = normalize_idea_text(text)?;
        let mut texts = self.load_texts()?;
        if texts.contains(&text) {
            return Err(StoreError::DuplicateIdea(text));
        }

        texts.push(text.clone());
        self.save_texts(&texts)?;
        Ok(Idea::local(text, true))
    }
}
