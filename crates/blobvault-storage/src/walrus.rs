//! HTTP client for Walrus publishers/aggregators (or a relay in front of them)

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};

use crate::error::{StorageError, StorageResult, truncate_body};
use crate::mirrors::{DEFAULT_COOLDOWN, Mirror, MirrorSet, Role};
use crate::network::Network;
use crate::response::parse_publisher_response;
use crate::traits::{BlobId, BlobStore, StoredBlob};

pub const DEFAULT_EPOCHS: u32 = 1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything needed to build a [`WalrusClient`]
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub mirrors: Vec<Mirror>,
    /// Storage epochs requested per upload
    pub epochs: u32,
    /// Whole-request timeout, body included
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// How long a failed mirror is deprioritized
    pub cooldown: Duration,
}

impl ClientConfig {
    pub fn new(mirrors: Vec<Mirror>) -> Self {
        Self {
            mirrors,
            epochs: DEFAULT_EPOCHS,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    pub fn for_network(network: Network) -> StorageResult<Self> {
        Ok(Self::new(network.default_mirrors()?))
    }

    pub fn with_epochs(mut self, epochs: u32) -> Self {
        self.epochs = epochs.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Walrus storage client with mirror failover
///
/// Owns one connection pool. Build it once at startup and share it by
/// reference or `Arc`.
pub struct WalrusClient {
    http: Client,
    mirrors: MirrorSet,
    epochs: u32,
}

impl WalrusClient {
    pub fn new(config: ClientConfig) -> StorageResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("blobvault/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let mirrors = MirrorSet::new(config.mirrors)?.with_cooldown(config.cooldown);

        Ok(Self {
            http,
            mirrors,
            epochs: config.epochs.max(1),
        })
    }

    pub fn mirrors(&self) -> &MirrorSet {
        &self.mirrors
    }

    pub fn epochs(&self) -> u32 {
        self.epochs
    }

    async fn upload_to(&self, mirror: Mirror, data: Bytes) -> StorageResult<StoredBlob> {
        let url = mirror
            .upload_url(self.epochs)
            .ok_or(StorageError::NoMirror("uploads"))?;
        tracing::debug!(mirror = mirror.name(), %url, size = data.len(), "PUT blob");

        let response = self
            .http
            .put(&url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Upload {
                status: status.as_u16(),
                message: truncate_body(body),
            });
        }

        let body = response.bytes().await?;
        parse_publisher_response(&body, &mirror)
    }

    async fn download_from(&self, mirror: Mirror, id: &BlobId) -> StorageResult<Vec<u8>> {
        let url = mirror.download_url(id.as_str());
        tracing::debug!(mirror = mirror.name(), %url, "GET blob");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(body.to_vec());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Transport {
            status: Some(status.as_u16()),
            message: format!(
                "{} returned {status}: {}",
                mirror.name(),
                truncate_body(body)
            ),
        })
    }
}

#[async_trait]
impl BlobStore for WalrusClient {
    async fn upload(&self, data: Bytes) -> StorageResult<StoredBlob> {
        let size = data.len();
        let stored = self
            .mirrors
            .try_each(Role::Upload, |mirror| self.upload_to(mirror, data.clone()))
            .await?;

        tracing::info!(
            blob_id = %stored.blob_id,
            status = ?stored.status,
            mirror = %stored.mirror,
            size,
            "Blob stored"
        );
        Ok(stored)
    }

    async fn download(&self, id: &BlobId) -> StorageResult<Vec<u8>> {
        let data = self
            .mirrors
            .try_each(Role::Download, |mirror| self.download_from(mirror, id))
            .await?;

        tracing::info!(blob_id = %id, size = data.len(), "Blob fetched");
        Ok(data)
    }
}
