use std::sync::PoisonError;
use thiserror::Error;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No record with the given id
    #[error("patient not found: {0}")]
    NotFound(u64),

    /// Lock error
    #[error("lock error: {0}")]
    Lock(String),

    /// I/O error from the file-backed store
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file-backed store held a document that could not be (de)serialized
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}
