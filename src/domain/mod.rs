pub mod bookmark;
pub mod row;
pub mod store;

pub use bookmark::{Bookmark, BookmarkRequest, Folder};
pub use row::FeedRow;
pub use store::{CategoryGroup, OTHER_CATEGORY, Store, category_label};
