use blobvault_core::CryptError;
use blobvault_storage::StorageError;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Crypt(#[from] CryptError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking cipher task panicked or was cancelled
    #[error("Cipher task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Worth retrying the same call later; bad input and wrong passwords are not
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_retryable(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound(_)))
    }
}
