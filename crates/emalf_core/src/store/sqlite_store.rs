//! SQLite-backed idea store used by the HTTP server.
//!
//! # Responsibility
//! - Persist ideas in the `ideas` table with server-assigned identity.
//! - Select random ideas inside SQLite so the full list never leaves the DB.
//!
//! # Invariants
//! - `ideas.text` is unique; a racing insert maps to `DuplicateIdea`.
//! - Listing order is insertion order (`seq ASC`).
//! - Read paths reject rows that fail `Idea::validate()`.

use crate::model::idea::{normalize_idea_text, Idea};
use crate::seed::DEFAULT_IDEAS;
use crate::store::idea_store::{IdeaStore, StoreError, StoreResult};
use log::info;
use rusqlite::{params, Connection, Row};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const IDEA_SELECT_SQL: &str = "SELECT uuid, text, created_at, user_submitted FROM ideas";

/// SQLite-backed implementation of [`IdeaStore`].
pub struct SqliteIdeaStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteIdeaStore<'conn> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts the built-in ideas when the table is empty.
    ///
    /// Returns the number of inserted rows (`0` when ideas already exist).
    pub fn seed_defaults(&mut self) -> StoreResult<usize> {
        if self.count()? > 0 {
            return Ok(0);
        }

        let created_at_ms = now_epoch_ms();
        let tx = self.conn.unchecked_transaction()?;
        for text in DEFAULT_IDEAS {
            let idea = Idea::with_new_id(text, false, created_at_ms);
            insert_idea(&tx, &idea)?;
        }
        tx.commit()?;

        info!(
            "event=seed_defaults module=store status=ok inserted={}",
            DEFAULT_IDEAS.len()
        );
        Ok(DEFAULT_IDEAS.len())
    }

    fn contains_text(&self, text: &str) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM ideas WHERE text = ?1);",
            [text],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl IdeaStore for SqliteIdeaStore<'_> {
    fn list_all(&mut self) -> StoreResult<Vec<Idea>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{IDEA_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut ideas = Vec::new();
        while let Some(row) = rows.next()? {
            ideas.push(parse_idea_row(row)?);
        }
        Ok(ideas)
    }

    fn pick_random(&mut self) -> StoreResult<Idea> {
        let mut stmt = self
            .conn
            .prepare(&format!("{IDEA_SELECT_SQL} ORDER BY RANDOM() LIMIT 1;"))?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => parse_idea_row(row),
            None => Err(StoreError::EmptyStore),
        }
    }

    fn add(&mut self, text: &str) -> StoreResult<Idea> {
        let text = normalize_idea_text(text)?;
        if self.contains_text(&text)? {
            return Err(StoreError::DuplicateIdea(text));
        }

        let idea = Idea::with_new_id(text, true, now_epoch_ms());
        match insert_idea(self.conn, &idea) {
            Ok(()) => Ok(idea),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateIdea(idea.text)),
            Err(err) => Err(err.into()),
        }
    }

    fn count(&mut self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ideas;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::StorageUnavailable(format!("invalid idea count {count}")))
    }
}

fn insert_idea(conn: &Connection, idea: &Idea) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO ideas (uuid, text, user_submitted, created_at) VALUES (?1, ?2, ?3, ?4);",
        params![
            idea.id.map(|id| id.to_string()),
            idea.text.as_str(),
            i64::from(idea.user_submitted),
            idea.created_at_ms,
        ],
    )?;
    Ok(())
}

fn parse_idea_row(row: &Row<'_>) -> StoreResult<Idea> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::StorageUnavailable(format!("invalid uuid value `{uuid_text}` in ideas.uuid"))
    })?;

    let user_submitted = match row.get::<_, i64>("user_submitted")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::StorageUnavailable(format!(
                "invalid user_submitted value `{other}` in ideas.user_submitted"
            )));
        }
    };

    let idea = Idea {
        id: Some(id),
        text: row.get("text")?,
        created_at_ms: Some(row.get("created_at")?),
        user_submitted,
    };
    idea.validate().map_err(|err| {
        StoreError::StorageUnavailable(format!("invalid persisted idea {id}: {err}"))
    })?;
    Ok(idea)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
