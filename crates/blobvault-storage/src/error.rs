//! Storage error types

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Publisher answered with something other than 200/201
    #[error("Upload rejected ({status}): {message}")]
    Upload { status: u16, message: String },

    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Network failure, timeout, or a non-2xx, non-404 download status
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Unexpected publisher response: {0}")]
    MalformedResponse(String),

    #[error("Invalid blob id: {0:?}")]
    InvalidBlobId(String),

    #[error("Invalid endpoint URL: {0:?}")]
    InvalidUrl(String),

    #[error("No mirror can serve {0}")]
    NoMirror(&'static str),
}

impl StorageError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Whether another mirror (or a later manual retry) might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Upload { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upload { status, .. } => Some(*status),
            Self::Transport { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            format!("request timed out: {e}")
        } else if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            e.to_string()
        };
        Self::Transport {
            status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}

/// Upstream error bodies are echoed into errors; keep them readable
pub const MAX_ERROR_BODY: usize = 512;

/// Cap an upstream error body at [`MAX_ERROR_BODY`] bytes
pub fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

/// 5xx, 408 and 429 are worth another mirror; other 4xx are the caller's fault
pub fn is_retryable_status(status: u16) -> bool {
    status >= 500 || status == 408 || status == 429
}
