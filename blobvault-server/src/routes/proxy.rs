use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::header,
    response::Response,
};
use blobvault_storage::BlobId;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct StoreQuery {
    pub epochs: Option<u32>,
}

/// PUT /api/proxy
/// Forward raw bytes to a publisher; the publisher's JSON comes back as-is
pub async fn store_blob(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
    body: Bytes,
) -> ServerResult<Response> {
    let epochs = query.epochs.unwrap_or(state.config.epochs).max(1);
    let size = body.len();

    let reply = state.relay.store(body, epochs).await?;
    tracing::info!(size, epochs, status = %reply.status, "Relayed upload");

    let content_type = reply
        .content_type
        .unwrap_or_else(|| header::HeaderValue::from_static("application/json"));

    Response::builder()
        .status(reply.status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(reply.body))
        .map_err(|e| ServerError::Internal(format!("Response build error: {e}")))
}

/// GET /api/proxy/{blob_id}
/// Stream the blob from an aggregator
pub async fn fetch_blob(
    State(state): State<AppState>,
    Path(blob_id): Path<String>,
) -> ServerResult<Response> {
    let id = BlobId::parse(blob_id)?;
    let upstream = state.relay.fetch(&id).await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("application/octet-stream"));
    let content_length = upstream.headers().get(header::CONTENT_LENGTH).cloned();

    tracing::info!(blob_id = %id, length = ?content_length, "Relaying download");

    let mut response = Response::builder()
        .status(upstream.status())
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate");
    if let Some(length) = content_length {
        response = response.header(header::CONTENT_LENGTH, length);
    }

    response
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ServerError::Internal(format!("Response build error: {e}")))
}
