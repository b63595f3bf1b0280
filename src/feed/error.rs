use thiserror::Error;

/// Every way a user fetch can fail. Callers of
/// [`UserDataSource::fetch_users`](super::UserDataSource::fetch_users) never
/// see this; it only reaches the log.
#[derive(Debug, Error)]
pub enum FetchUnavailable {
    #[error("request to random-data-api failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("random-data-api returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed users payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
