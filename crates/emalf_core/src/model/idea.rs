//! Idea domain model and text normalization.
//!
//! # Responsibility
//! - Define the record shared by every store implementation.
//! - Own the single normalization rule applied before persistence.
//!
//! # Invariants
//! - `text` has no leading/trailing whitespace and is never empty.
//! - `text` is at most [`MAX_IDEA_CHARS`] characters long.
//! - `id` is present only for ideas persisted by an identity-assigning store.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Upper bound on idea length, counted in Unicode scalar values.
pub const MAX_IDEA_CHARS: usize = 200;

/// Stable identifier assigned by remote-backed stores.
pub type IdeaId = Uuid;

/// One drawing-challenge entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    /// Absent for ideas kept in local storage.
    pub id: Option<IdeaId>,
    pub text: String,
    /// Unix epoch milliseconds, assigned by the SQLite store.
    pub created_at_ms: Option<i64>,
    /// `false` for the built-in seed set.
    pub user_submitted: bool,
}

impl Idea {
    /// Creates an identity-less idea, as held by local storage.
    pub fn local(text: impl Into<String>, user_submitted: bool) -> Self {
        Self {
            id: None,
            text: text.into(),
            created_at_ms: None,
            user_submitted,
        }
    }

    /// Creates an idea with a freshly generated stable ID.
    pub fn with_new_id(text: impl Into<String>, user_submitted: bool, created_at_ms: i64) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            text: text.into(),
            created_at_ms: Some(created_at_ms),
            user_submitted,
        }
    }

    /// Re-checks the text invariants on an already constructed idea.
    ///
    /// Read paths call this to reject corrupted persisted state.
    pub fn validate(&self) -> Result<(), IdeaValidationError> {
        let normalized = normalize_idea_text(&self.text)?;
        if normalized != self.text {
            return Err(IdeaValidationError::NotTrimmed);
        }
        Ok(())
    }
}

/// Rejection reasons for submitted idea text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaValidationError {
    /// Empty or whitespace-only input.
    Blank,
    TooLong { max: usize, actual: usize },
    /// Stored text carries surrounding whitespace.
    NotTrimmed,
    /// A remote store refused the text with the given reason.
    Rejected(String),
}

impl Display for IdeaValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "idea text must not be blank"),
            Self::TooLong { max, actual } => {
                write!(f, "idea text is {actual} characters long; limit is {max}")
            }
            Self::NotTrimmed => write!(f, "idea text has surrounding whitespace"),
            Self::Rejected(detail) => write!(f, "idea text rejected: {detail}"),
        }
    }
}

impl Error for IdeaValidationError {}

/// Trims `raw` and checks it against the idea text rules.
pub fn normalize_idea_text(raw: &str) -> Result<String, IdeaValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdeaValidationError::Blank);
    }

    let actual = trimmed.chars().count();
    if actual > MAX_IDEA_CHARS {
        return Err(IdeaValidationError::TooLong {
            max: MAX_IDEA_CHARS,
            actual,
        });
    }

    Ok(trimmed.to_string())
}
