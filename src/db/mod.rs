//! SQLite persistence for stores, folders and bookmarks.
//!
//! Connections returned from [`open_db`] and [`open_db_in_memory`] have
//! foreign keys enabled and every migration applied.

use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod bookmarks;
pub mod stores;

pub use bookmarks::{BookmarkRepository, SqliteBookmarkRepository};
pub use stores::{SqliteStoreRepository, StoreRepository};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("migrations/0001_init.sql"),
}];

/// Latest schema version this binary knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Open (or create) a database file and bring its schema up to date.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let path = path.as_ref();

    let mut conn = Connection::open(path)?;
    bootstrap_connection(&mut conn)?;

    tracing::info!(
        path = %path.display(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "database opened"
    );
    Ok(conn)
}

pub fn open_db_in_memory() -> DbResult<Connection> {
    let mut conn = Connection::open_in_memory()?;
    bootstrap_connection(&mut conn)?;
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)
}

fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        tracing::debug!(version = migration.version, "applied migration");
    }
    tx.commit()?;

    Ok(())
}
