//! Failures of a single HTTP call, before they are attributed to an endpoint.

use horde_node::SourceError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("node returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response: {0}")]
    Invalid(String),
}

impl CallError {
    /// Attribute the failure to the peer-list endpoint.
    pub fn into_peer_fetch(self) -> SourceError {
        SourceError::PeerFetch(self.to_string())
    }

    /// Attribute the failure to the submit endpoint.
    pub fn into_submission(self) -> SourceError {
        match self {
            CallError::Rejected { message, .. } => SourceError::SubmissionRejected(message),
            other => SourceError::SubmissionRejected(other.to_string()),
        }
    }

    /// Attribute the failure to a make/transfer endpoint.
    pub fn into_transaction(self) -> SourceError {
        match self {
            CallError::Transport(e) => SourceError::Transport(e),
            CallError::Rejected { message, .. } => SourceError::TransactionRejected(message),
            CallError::Invalid(e) => SourceError::InvalidResponse(e),
        }
    }
}
