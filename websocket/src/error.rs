use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to connect to feed {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("feed protocol error: {0}")]
    Protocol(String),
}
