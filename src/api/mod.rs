pub mod feed;
pub mod kakao;

pub use feed::{FeedClient, FeedError, FeedResponse, FeedSource, parse_feed_body};
pub use kakao::{KakaoClient, MapApiError, Place, PlaceLookup};
