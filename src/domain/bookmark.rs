/// A user-owned, named collection of bookmarked stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}

/// A store saved into a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: i64,
    pub folder_id: i64,
    pub store_id: i64,
}

/// A request to bookmark `store_id` into `folder_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkRequest {
    pub folder_id: i64,
    pub store_id: i64,
}
