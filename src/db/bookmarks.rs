use rusqlite::{Connection, OptionalExtension, params};

use super::DbResult;
use crate::domain::{Bookmark, Folder};

/// Folder and bookmark rows
pub trait BookmarkRepository {
    fn create_folder(&self, user_id: i64, name: &str) -> DbResult<Folder>;
    fn find_folder(&self, id: i64) -> DbResult<Option<Folder>>;
    fn insert_bookmark(&self, folder_id: i64, store_id: i64) -> DbResult<Bookmark>;
    fn list_bookmarks(&self, folder_id: i64) -> DbResult<Vec<Bookmark>>;
}

pub struct SqliteBookmarkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookmarkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookmarkRepository for SqliteBookmarkRepository<'_> {
    fn create_folder(&self, user_id: i64, name: &str) -> DbResult<Folder> {
        self.conn.execute(
            "INSERT INTO folders (user_id, name) VALUES (?1, ?2);",
            params![user_id, name],
        )?;

        Ok(Folder {
            id: self.conn.last_insert_rowid(),
            user_id,
            name: name.to_string(),
        })
    }

    fn find_folder(&self, id: i64) -> DbResult<Option<Folder>> {
        let folder = self
            .conn
            .query_row(
                "SELECT id, user_id, name FROM folders WHERE id = ?1;",
                params![id],
                |row| {
                    Ok(Folder {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(folder)
    }

    fn insert_bookmark(&self, folder_id: i64, store_id: i64) -> DbResult<Bookmark> {
        self.conn.execute(
            "INSERT INTO bookmarks (folder_id, store_id) VALUES (?1, ?2);",
            params![folder_id, store_id],
        )?;

        Ok(Bookmark {
            id: self.conn.last_insert_rowid(),
            folder_id,
            store_id,
        })
    }

    fn list_bookmarks(&self, folder_id: i64) -> DbResult<Vec<Bookmark>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, folder_id, store_id FROM bookmarks WHERE folder_id = ?1 ORDER BY id;",
        )?;
        let rows = stmt.query_map(params![folder_id], |row| {
            Ok(Bookmark {
                id: row.get(0)?,
                folder_id: row.get(1)?,
                store_id: row.get(2)?,
            })
        })?;

        let mut bookmarks = Vec::new();
        for row in rows {
            bookmarks.push(row?);
        }
        Ok(bookmarks)
    }
}
