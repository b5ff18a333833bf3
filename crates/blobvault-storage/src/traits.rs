//! Storage trait and the types that cross it

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Longest id accepted; Walrus ids are 43 characters
const MAX_BLOB_ID_LEN: usize = 128;

/// Content-addressed blob identifier assigned by the storage network
///
/// Opaque to us apart from the character set: URL-safe base64, which keeps
/// ids safe to splice into a request path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobId(String);

impl BlobId {
    pub fn parse(s: impl Into<String>) -> StorageResult<Self> {
        let s = s.into();
        let valid_chars = s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if s.is_empty() || s.len() > MAX_BLOB_ID_LEN || !valid_chars {
            return Err(StorageError::InvalidBlobId(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BlobId {
    type Err = StorageError;

    fn from_str(s: &str) -> StorageResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BlobId {
    type Error = StorageError;

    fn try_from(s: String) -> StorageResult<Self> {
        Self::parse(s)
    }
}

impl From<BlobId> for String {
    fn from(id: BlobId) -> Self {
        id.0
    }
}

/// How the publisher satisfied an upload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobStatus {
    /// Fresh storage was registered for this content
    NewlyCreated,
    /// Identical content was already certified (dedup hit)
    AlreadyCertified,
}

/// Normalized result of a successful upload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub blob_id: BlobId,
    pub status: BlobStatus,
    /// Last epoch the blob is guaranteed to be retained
    pub end_epoch: Option<u64>,
    /// Sui object id for new blobs, certifying tx digest for dedup hits
    pub sui_ref: String,
    /// Name of the mirror that accepted the upload
    pub mirror: String,
    /// Where the blob can be fetched, on the accepting mirror's download side
    pub blob_url: String,
}

/// Blob storage network client
///
/// Implementations hold no per-blob state; retention is owned by the network.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` and return the identifier the network assigned
    async fn upload(&self, data: Bytes) -> StorageResult<StoredBlob>;

    /// Fetch the raw bytes for `id`
    ///
    /// Returns `StorageError::NotFound` if no mirror knows the blob.
    async fn download(&self, id: &BlobId) -> StorageResult<Vec<u8>>;
}
