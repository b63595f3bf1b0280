pub mod config;
pub mod controller;
pub mod feed;
pub mod tui;

pub use controller::{FeedPhase, FeedState, UserFeedController};
pub use feed::types::UserRecord;
pub use feed::{RandomDataApi, UserDataSource};
