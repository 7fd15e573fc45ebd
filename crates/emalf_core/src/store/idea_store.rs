//! Backend-agnostic idea store contract.

use crate::db::DbError;
use crate::model::idea::{Idea, IdeaValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure taxonomy shared by every store backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Submitted text failed normalization.
    Validation(IdeaValidationError),
    /// An idea with identical (trimmed) text already exists.
    DuplicateIdea(String),
    /// A random pick was requested from a store with no ideas.
    EmptyStore,
    /// Underlying storage or network failure.
    StorageUnavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateIdea(text) => write!(f, "idea already exists: `{text}`"),
            Self::EmptyStore => write!(f, "no ideas available"),
            Self::StorageUnavailable(message) => write!(f, "idea storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IdeaValidationError> for StoreError {
    fn from(value: IdeaValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::StorageUnavailable(value.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}

/// Authoritative collection of ideas.
///
/// All methods take `&mut self`: backends may seed lazily, advance a random
/// source, or reuse a connection.
pub trait IdeaStore {
    /// Returns every stored idea.
    fn list_all(&mut self) -> StoreResult<Vec<Idea>>;

    /// Returns one idea chosen uniformly at random.
    ///
    /// # Errors
    /// - `EmptyStore` when the store holds no ideas.
    fn pick_random(&mut self) -> StoreResult<Idea>;

    /// Trims and persists `text`, returning the stored idea.
    ///
    /// # Errors
    /// - `Validation` when the trimmed text is empty or too long.
    /// - `DuplicateIdea` when the trimmed text is already stored.
    fn add(&mut self, text: &str) -> StoreResult<Idea>;

    /// Number of stored ideas.
    fn count(&mut self) -> StoreResult<usize> {
        Ok(self.list_all()?.len())
    }
}

impl<S: IdeaStore + ?Sized> IdeaStore for Box<S> {
    fn list_all(&mut self) -> StoreResult<Vec<Idea>> {
        (**self).list_all()
    }

    fn pick_random(&mut self) -> StoreResult<Idea> {
        (**self).pick_random()
    }

    fn add(&mut self, text: &str) -> StoreResult<Idea> {
        (**self).add(text)
    }

    fn count(&mut self) -> StoreResult<usize> {
        (**self).count()
    }
}

impl<S: IdeaStore + ?Sized> IdeaStore for &mut S {
    fn list_all(&mut self) -> StoreResult<Vec<Idea>> {
        (**self).list_all()
    }

    fn pick_random(&mut self) -> StoreResult<Idea> {
        (**self).pick_random()
    }

    fn add(&mut self, text: &str) -> StoreResult<Idea> {
        (**self).add(text)
    }

    fn count(&mut self) -> StoreResult<usize> {
        (**self).count()
    }
}
