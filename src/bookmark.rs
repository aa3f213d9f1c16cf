//! Folder and bookmark operations on top of persisted stores.

use rusqlite::Connection;
use thiserror::Error;

use crate::db::{
    BookmarkRepository, DbError, SqliteBookmarkRepository, SqliteStoreRepository, StoreRepository,
};
use crate::domain::{Bookmark, BookmarkRequest, Folder};

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("folder does not exist: {0}")]
    FolderNotFound(i64),
    #[error("store does not exist: {0}")]
    StoreNotFound(i64),
    #[error("folder name cannot be empty")]
    EmptyFolderName,
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<rusqlite::Error> for BookmarkError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub struct BookmarkService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> BookmarkService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn create_folder(&self, user_id: i64, name: &str) -> Result<Folder, BookmarkError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BookmarkError::EmptyFolderName);
        }

        let folder = SqliteBookmarkRepository::new(self.conn).create_folder(user_id, name)?;
        tracing::info!(folder_id = folder.id, user_id, "folder created");
        Ok(folder)
    }

    /// Save a store into a folder and bump the store's bookmark counter.
    ///
    /// Both writes commit together or not at all.
    pub fn bookmark(&self, request: BookmarkRequest) -> Result<Bookmark, BookmarkError> {
        let tx = self.conn.unchecked_transaction()?;
        let folders = SqliteBookmarkRepository::new(&tx);
        let stores = SqliteStoreRepository::new(&tx);

        folders
            .find_folder(request.folder_id)?
            .ok_or(BookmarkError::FolderNotFound(request.folder_id))?;
        if !stores.add_bookmark_count(request.store_id, 1)? {
            return Err(BookmarkError::StoreNotFound(request.store_id));
        }
        let bookmark = folders.insert_bookmark(request.folder_id, request.store_id)?;

        tx.commit()?;
        tracing::info!(
            bookmark_id = bookmark.id,
            folder_id = bookmark.folder_id,
            store_id = bookmark.store_id,
            "store bookmarked"
        );
        Ok(bookmark)
    }

    pub fn list(&self, folder_id: i64) -> Result<Vec<Bookmark>, BookmarkError> {
        let folders = SqliteBookmarkRepository::new(self.conn);
        folders
            .find_folder(folder_id)?
            .ok_or(BookmarkError::FolderNotFound(folder_id))?;
        Ok(folders.list_bookmarks(folder_id)?)
    }
}
