use thiserror::Error;

/// Failure taxonomy surfaced to the caller of a sync run.
///
/// The core performs no retries or backoff: the first error encountered
/// aborts the remainder of the run. Mutations already applied are kept;
/// the next successful run corrects any partial state.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing or invalid bearer token (HTTP 401/403). Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The remote service rejected a call (rate limit, validation, ...).
    /// Carries the remote's own message.
    #[error("remote API error: {0}")]
    RemoteApi(String),

    /// Network / connection level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
