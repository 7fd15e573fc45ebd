use emalf_core::db::migrations::latest_version;
use emalf_core::db::{open_db, open_db_in_memory, DbError};
use emalf_core::{IdeaStore, SqliteIdeaStore, DEFAULT_IDEAS};
use rusqlite::{Connection, ErrorCode};

fn insert_raw(conn: &Connection, uuid: &str, text: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO ideas (uuid, text, user_submitted) VALUES (?1, ?2, 1);",
        [uuid, text],
    )
}

fn constraint_code(result: rusqlite::Result<usize>) -> Option<ErrorCode> {
    match result {
        Err(rusqlite::Error::SqliteFailure(err, _)) => Some(err.code),
        _ => None,
    }
}

#[test]
fn fresh_database_has_empty_ideas_table_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert_eq!(SqliteIdeaStore::new(&conn).count().unwrap(), 0);
}

#[test]
fn ideas_text_is_unique_at_schema_level() {
    let conn = open_db_in_memory().unwrap();
    insert_raw(&conn, "u1", "Draw a cat").unwrap();

    assert_eq!(
        constraint_code(insert_raw(&conn, "u2", "Draw a cat")),
        Some(ErrorCode::ConstraintViolation)
    );
    // Case differs, so the row is distinct.
    insert_raw(&conn, "u3", "draw a cat").unwrap();
}

#[test]
fn ideas_uuid_is_unique_and_blank_text_rejected() {
    let conn = open_db_in_memory().unwrap();
    insert_raw(&conn, "u1", "Draw a cat").unwrap();

    assert_eq!(
        constraint_code(insert_raw(&conn, "u1", "Draw a dog")),
        Some(ErrorCode::ConstraintViolation)
    );
    assert_eq!(
        constraint_code(insert_raw(&conn, "u2", "   ")),
        Some(ErrorCode::ConstraintViolation)
    );
}

#[test]
fn created_at_defaults_to_epoch_milliseconds() {
    let conn = open_db_in_memory().unwrap();
    insert_raw(&conn, "u1", "Draw a cat").unwrap();

    let created_at: i64 = conn
        .query_row("SELECT created_at FROM ideas WHERE uuid = 'u1';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert!(created_at > 1_600_000_000_000);
    assert_eq!(created_at % 1000, 0);
}

#[test]
fn seeded_pool_survives_reopen_without_reseeding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emalfdraw.db");

    let conn = open_db(&path).unwrap();
    SqliteIdeaStore::new(&conn).seed_defaults().unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let mut store = SqliteIdeaStore::new(&conn);
    store.seed_defaults().unwrap();
    assert_eq!(store.count().unwrap(), DEFAULT_IDEAS.len());
}

#[test]
fn idea_database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}
