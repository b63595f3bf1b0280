pub mod error;
pub mod random_data_api;
pub mod types;

use async_trait::async_trait;
use std::num::NonZeroUsize;
use types::UserRecord;

pub use error::FetchUnavailable;
pub use random_data_api::RandomDataApi;

/// Source of generated user records.
///
/// Fetching is fail-soft: transport errors, bad status codes and malformed
/// bodies all come back as an empty vector, never as an error.
#[async_trait]
pub trait UserDataSource: Send + Sync {
    async fn fetch_users(&self, count: NonZeroUsize) -> Vec<UserRecord>;
}
