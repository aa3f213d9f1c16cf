use rusqlite::{Connection, OptionalExtension, Row, params};

use super::DbResult;
use crate::domain::Store;

const STORE_SELECT_SQL: &str = "SELECT
    id,
    name,
    address,
    phone,
    latitude,
    longitude,
    category,
    bookmark_count
FROM stores";

/// Store persistence used by the ingestion sink and bookmarks
pub trait StoreRepository {
    fn exists(&self, id: i64) -> DbResult<bool>;
    /// Insert a new store. Callers check [`StoreRepository::exists`] first.
    fn insert(&self, store: &Store) -> DbResult<()>;
    fn find(&self, id: i64) -> DbResult<Option<Store>>;
    fn count(&self) -> DbResult<u64>;
    /// Adjust the bookmark counter. Returns `false` when no such store exists.
    fn add_bookmark_count(&self, id: i64, delta: i64) -> DbResult<bool>;
}

pub struct SqliteStoreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStoreRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StoreRepository for SqliteStoreRepository<'_> {
    fn exists(&self, id: i64) -> DbResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM stores WHERE id = ?1;", params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn insert(&self, store: &Store) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO stores (
                id,
                name,
                address,
                phone,
                latitude,
                longitude,
                category,
                bookmark_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                store.id,
                store.name.as_str(),
                store.address.as_str(),
                store.phone.as_deref(),
                store.latitude,
                store.longitude,
                store.category.as_str(),
                store.bookmark_count,
            ],
        )?;
        Ok(())
    }

    fn find(&self, id: i64) -> DbResult<Option<Store>> {
        let store = self
            .conn
            .query_row(
                &format!("{STORE_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_store_row,
            )
            .optional()?;
        Ok(store)
    }

    fn count(&self) -> DbResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM stores;", [], |row| row.get::<_, i64>(0))?;
        Ok(count.max(0) as u64)
    }

    fn add_bookmark_count(&self, id: i64, delta: i64) -> DbResult<bool> {
        let changed = self.conn.execute(
            "UPDATE stores SET bookmark_count = bookmark_count + ?1 WHERE id = ?2;",
            params![delta, id],
        )?;
        Ok(changed > 0)
    }
}

fn parse_store_row(row: &Row<'_>) -> rusqlite::Result<Store> {
    Ok(Store {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        category: row.get(6)?,
        bookmark_count: row.get(7)?,
    })
}
