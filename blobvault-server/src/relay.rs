//! Upstream forwarding with mirror failover

use blobvault_storage::{
    BlobId, Mirror, MirrorSet, Role, StorageError, StorageResult, truncate_body,
};
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};

use crate::config::Config;

/// A successful upstream upload, passed back unmodified
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<header::HeaderValue>,
    pub body: Bytes,
}

/// Forwards blob traffic to Walrus mirrors
///
/// Holds no blob state. The connection pool and mirror health counters are
/// the only things shared between requests.
pub struct Relay {
    http: Client,
    mirrors: MirrorSet,
}

impl Relay {
    pub fn new(config: &Config) -> StorageResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("blobvault-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            mirrors: MirrorSet::new(config.resolve_mirrors()?)?,
        })
    }

    pub fn mirrors(&self) -> &MirrorSet {
        &self.mirrors
    }

    /// PUT `body` on the first publisher that accepts it
    pub async fn store(&self, body: Bytes, epochs: u32) -> StorageResult<UpstreamReply> {
        self.mirrors
            .try_each(Role::Upload, |mirror| self.store_on(mirror, body.clone(), epochs))
            .await
    }

    /// GET `id` from the first aggregator that has it
    ///
    /// The response is returned before its body is read so it can be
    /// streamed through.
    pub async fn fetch(&self, id: &BlobId) -> StorageResult<reqwest::Response> {
        self.mirrors
            .try_each(Role::Download, |mirror| self.fetch_from(mirror, id))
            .await
    }

    async fn store_on(
        &self,
        mirror: Mirror,
        body: Bytes,
        epochs: u32,
    ) -> StorageResult<UpstreamReply> {
        let url = mirror
            .upload_url(epochs)
            .ok_or(StorageError::NoMirror("uploads"))?;
        tracing::debug!(mirror = mirror.name(), %url, size = body.len(), "Forwarding upload");

        let response = self
            .http
            .put(&url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Upload {
                status: status.as_u16(),
                message: format!("{} returned {status}: {}", mirror.name(), truncate_body(body)),
            });
        }

        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }

    async fn fetch_from(&self, mirror: Mirror, id: &BlobId) -> StorageResult<reqwest::Response> {
        let url = mirror.download_url(id.as_str());
        tracing::debug!(mirror = mirror.name(), %url, "Forwarding download");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Err(StorageError::Transport {
            status: Some(status.as_u16()),
            message: format!("{} returned {status}", mirror.name()),
        })
    }
}
