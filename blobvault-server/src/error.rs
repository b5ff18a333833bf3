use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blobvault_storage::StorageError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Every upstream mirror failed
    #[error("Upstream failure: {message}")]
    BadGateway {
        message: String,
        upstream_status: Option<u16>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ServerError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(id) => ServerError::NotFound(format!("Blob {id} not found")),
            StorageError::InvalidBlobId(id) => {
                ServerError::BadRequest(format!("Invalid blob id: {id:?}"))
            }
            other => ServerError::BadGateway {
                upstream_status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ServerError::BadGateway {
                message,
                upstream_status,
            } => {
                tracing::warn!(?upstream_status, "Upstream failure: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": message, "upstream_status": upstream_status }),
                )
            }
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
