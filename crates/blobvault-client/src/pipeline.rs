//! Upload/download orchestration

use std::path::Path;
use std::sync::Arc;

use blobvault_core::PasswordCipher;
use blobvault_storage::{BlobId, BlobStatus, BlobStore};
use bytes::Bytes;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::PipelineResult;

/// Name recorded when a path has no usable file name
const FALLBACK_NAME: &str = "blob";

/// What the caller gets back from an upload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub file_name: String,
    pub blob_id: BlobId,
    /// Sui object id, or the certifying tx digest for a dedup hit
    pub storage_ref: String,
    /// Public download URL on the mirror that accepted the blob
    pub blob_url: String,
    pub status: BlobStatus,
    pub end_epoch: Option<u64>,
    pub encrypted: bool,
    /// Bytes actually sent, after encryption
    pub size: usize,
}

/// Encrypt-then-store and fetch-then-decrypt over any [`BlobStore`]
///
/// An empty password means "no encryption", same as passing `None`.
#[derive(Clone)]
pub struct BlobPipeline {
    store: Arc<dyn BlobStore>,
    cipher: PasswordCipher,
}

impl BlobPipeline {
    pub fn new(store: Arc<dyn BlobStore>, cipher: PasswordCipher) -> Self {
        Self { store, cipher }
    }

    pub fn cipher(&self) -> PasswordCipher {
        self.cipher
    }

    /// Read `path`, optionally encrypt it, and store it
    pub async fn upload_file(
        &self,
        path: &Path,
        password: Option<&str>,
    ) -> PipelineResult<UploadResult> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(FALLBACK_NAME);

        self.upload_bytes(file_name, data, password).await
    }

    pub async fn upload_bytes(
        &self,
        file_name: &str,
        data: Vec<u8>,
        password: Option<&str>,
    ) -> PipelineResult<UploadResult> {
        let plaintext_len = data.len();
        let (payload, encrypted) = match password.filter(|p| !p.is_empty()) {
            Some(password) => (self.encrypt(data, password).await?, true),
            None => (data, false),
        };
        let size = payload.len();

        tracing::debug!(file_name, plaintext_len, size, encrypted, "Uploading");
        let stored = self.store.upload(Bytes::from(payload)).await?;

        Ok(UploadResult {
            file_name: file_name.to_string(),
            blob_id: stored.blob_id,
            storage_ref: stored.sui_ref,
            blob_url: stored.blob_url,
            status: stored.status,
            end_epoch: stored.end_epoch,
            encrypted,
            size,
        })
    }

    /// Fetch `id` and decrypt it when a password is given
    pub async fn download_file(
        &self,
        id: &BlobId,
        password: Option<&str>,
    ) -> PipelineResult<Vec<u8>> {
        let data = self.store.download(id).await?;
        tracing::debug!(blob_id = %id, size = data.len(), "Downloaded");

        match password.filter(|p| !p.is_empty()) {
            Some(password) => self.decrypt(data, password).await,
            None => Ok(data),
        }
    }

    async fn encrypt(&self, data: Vec<u8>, password: &str) -> PipelineResult<Vec<u8>> {
        let cipher = self.cipher;
        let password = Zeroizing::new(password.to_string());
        let blob =
            tokio::task::spawn_blocking(move || cipher.encrypt(&data, &password)).await??;
        Ok(blob.into_bytes())
    }

    async fn decrypt(&self, data: Vec<u8>, password: &str) -> PipelineResult<Vec<u8>> {
        let cipher = self.cipher;
        let password = Zeroizing::new(password.to_string());
        let plaintext =
            tokio::task::spawn_blocking(move || cipher.decrypt(&data, &password)).await??;
        Ok(plaintext)
    }
}
