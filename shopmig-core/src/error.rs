use thiserror::Error;

/// Failure of a single call against the remote admin session. The reason is
/// whatever the collaborator reported (timeout, navigation failure, rejected
/// form submit) and is carried verbatim into outcome reports.
#[derive(Error, Debug, Clone)]
#[error("remote operation failed: {reason}")]
pub struct RemoteOperationError {
    pub reason: String,
}

impl RemoteOperationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("malformed category sequence: {0}")]
    Structural(String),

    #[error(transparent)]
    Remote(#[from] RemoteOperationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MigrateError>;
