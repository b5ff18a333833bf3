//! In-memory blob store (for testing)

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::traits::{BlobId, BlobStatus, BlobStore, StoredBlob};

/// Content-addressed store that behaves like a publisher/aggregator pair
///
/// Ids are the BLAKE3 hash of the content, so identical uploads collapse
/// into an `AlreadyCertified` hit the way they do on Walrus. Not
/// persistent; data is lost on drop.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobId, Vec<u8>>>,
    end_epoch: u64,
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::with_end_epoch(1)
    }

    /// Report `end_epoch` on every stored blob
    pub fn with_end_epoch(end_epoch: u64) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            end_epoch,
        }
    }

    /// Number of stored blobs
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stored bytes for `id`, bypassing the trait
    pub async fn raw(&self, id: &BlobId) -> Option<Vec<u8>> {
        self.blobs.read().await.get(id).cloned()
    }
}

fn content_id(hash: &blake3::Hash) -> StorageResult<BlobId> {
    BlobId::parse(URL_SAFE_NO_PAD.encode(hash.as_bytes()))
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, data: Bytes) -> StorageResult<StoredBlob> {
        let hash = blake3::hash(&data);
        let blob_id = content_id(&hash)?;

        let mut blobs = self.blobs.write().await;
        let status = if blobs.contains_key(&blob_id) {
            BlobStatus::AlreadyCertified
        } else {
            blobs.insert(blob_id.clone(), data.to_vec());
            BlobStatus::NewlyCreated
        };

        let sui_ref = match status {
            BlobStatus::NewlyCreated => format!("0x{}", hash.to_hex()),
            BlobStatus::AlreadyCertified => URL_SAFE_NO_PAD.encode(&hash.as_bytes()[..16]),
        };

        Ok(StoredBlob {
            blob_url: format!("memory:{blob_id}"),
            blob_id,
            status,
            end_epoch: Some(self.end_epoch),
            sui_ref,
            mirror: "memory".into(),
        })
    }

    async fn download(&self, id: &BlobId) -> StorageResult<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
