use thiserror::Error;

use crate::collaborators::SourceError;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("tracker service has stopped")]
    ServiceStopped,
}
