//! Publisher/aggregator mirrors and failover across them
//!
//! Each call starts one position further round the ring. Mirrors that failed
//! within the cooldown window go to the back of the line rather than being
//! skipped, so a fully degraded set still gets tried.

use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::error::{StorageError, StorageResult};

/// How long a failed mirror is deprioritized
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);

/// One storage endpoint pair, reached directly or via a relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mirror {
    /// Walrus HTTP API: `/v1/blobs` on the publisher and aggregator
    Walrus {
        name: String,
        /// Read-only mirrors (most mainnet aggregators) have no publisher
        publisher: Option<String>,
        aggregator: String,
    },
    /// A blobvault relay: `/api/proxy` for both directions
    Relay { name: String, base: String },
}

impl Mirror {
    pub fn walrus(
        name: impl Into<String>,
        publisher: Option<&str>,
        aggregator: &str,
    ) -> StorageResult<Self> {
        Ok(Self::Walrus {
            name: name.into(),
            publisher: publisher.map(normalize_base).transpose()?,
            aggregator: normalize_base(aggregator)?,
        })
    }

    pub fn relay(name: impl Into<String>, base: &str) -> StorageResult<Self> {
        Ok(Self::Relay {
            name: name.into(),
            base: normalize_base(base)?,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Walrus { name, .. } | Self::Relay { name, .. } => name,
        }
    }

    pub fn can_upload(&self) -> bool {
        match self {
            Self::Walrus { publisher, .. } => publisher.is_some(),
            Self::Relay { .. } => true,
        }
    }

    /// Upload URL, or `None` for read-only mirrors
    pub fn upload_url(&self, epochs: u32) -> Option<String> {
        match self {
            Self::Walrus { publisher, .. } => publisher
                .as_ref()
                .map(|p| format!("{p}/v1/blobs?epochs={epochs}")),
            Self::Relay { base, .. } => Some(format!("{base}/api/proxy?epochs={epochs}")),
        }
    }

    pub fn download_url(&self, blob_id: &str) -> String {
        match self {
            Self::Walrus { aggregator, .. } => format!("{aggregator}/v1/blobs/{blob_id}"),
            Self::Relay { base, .. } => format!("{base}/api/proxy/{blob_id}"),
        }
    }
}

/// Which direction a call goes; uploads need a publisher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Upload,
    Download,
}

impl Role {
    fn label(self) -> &'static str {
        match self {
            Role::Upload => "uploads",
            Role::Download => "downloads",
        }
    }
}

/// Ordered mirrors with lock-free health tracking
pub struct MirrorSet {
    mirrors: Vec<Mirror>,
    /// Milliseconds since `epoch` at last failure, plus one; zero means healthy
    failed_at: Vec<AtomicU64>,
    cursor: AtomicUsize,
    epoch: Instant,
    cooldown: Duration,
}

impl MirrorSet {
    pub fn new(mirrors: Vec<Mirror>) -> StorageResult<Self> {
        if mirrors.is_empty() {
            return Err(StorageError::NoMirror("any request"));
        }
        let failed_at = mirrors.iter().map(|_| AtomicU64::new(0)).collect();
        Ok(Self {
            mirrors,
            failed_at,
            cursor: AtomicUsize::new(0),
            epoch: Instant::now(),
            cooldown: DEFAULT_COOLDOWN,
        })
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirrors
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    pub fn is_healthy(&self, idx: usize) -> bool {
        let stamp = self.failed_at[idx].load(Ordering::Relaxed);
        if stamp == 0 {
            return true;
        }
        let failed = Duration::from_millis(stamp - 1);
        self.epoch.elapsed().saturating_sub(failed) >= self.cooldown
    }

    pub fn mark_failed(&self, idx: usize) {
        let now = self.epoch.elapsed().as_millis() as u64 + 1;
        self.failed_at[idx].store(now, Ordering::Relaxed);
    }

    pub fn mark_healthy(&self, idx: usize) {
        self.failed_at[idx].store(0, Ordering::Relaxed);
    }

    /// Indices to try for one call: rotated, eligible, healthy first
    pub fn attempt_order(&self, role: Role) -> Vec<usize> {
        let n = self.mirrors.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % n;

        let (healthy, cooling): (Vec<usize>, Vec<usize>) = (0..n)
            .map(|offset| (start + offset) % n)
            .filter(|&idx| role == Role::Download || self.mirrors[idx].can_upload())
            .partition(|&idx| self.is_healthy(idx));

        healthy.into_iter().chain(cooling).collect()
    }

    /// Run `op` against mirrors until one succeeds
    ///
    /// Retryable errors mark the mirror failed and move on. `NotFound` moves
    /// on without penalty and is only returned when every mirror reported it.
    /// Any other error is returned immediately.
    pub async fn try_each<T, F, Fut>(&self, role: Role, mut op: F) -> StorageResult<T>
    where
        F: FnMut(Mirror) -> Fut,
        Fut: Future<Output = StorageResult<T>>,
    {
        let order = self.attempt_order(role);
        if order.is_empty() {
            return Err(StorageError::NoMirror(role.label()));
        }

        let mut not_found = None;
        let mut last_failure = None;

        for idx in order {
            let mirror = self.mirrors[idx].clone();
            let name = mirror.name().to_string();

            match op(mirror).await {
                Ok(value) => {
                    self.mark_healthy(idx);
                    return Ok(value);
                }
                Err(e @ StorageError::NotFound(_)) => {
                    tracing::debug!(mirror = %name, "Blob not on mirror, trying next");
                    not_found = Some(e);
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(mirror = %name, error = %e, "Mirror failed, trying next");
                    self.mark_failed(idx);
                    last_failure = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // A transport failure means the 404s we saw may not be authoritative
        match last_failure.or(not_found) {
            Some(e) => Err(e),
            None => Err(StorageError::NoMirror(role.label())),
        }
    }
}

/// Validate an endpoint base URL and strip trailing slashes
fn normalize_base(url: &str) -> StorageResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let parsed =
        reqwest::Url::parse(trimmed).map_err(|_| StorageError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(StorageError::InvalidUrl(url.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walrus(name: &str, with_publisher: bool) -> Mirror {
        let publisher = format!("https://publisher.{name}");
        Mirror::walrus(
            name,
            with_publisher.then_some(publisher.as_str()),
            &format!("https://aggregator.{name}/"),
        )
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let m = walrus("example.org", true);
        assert_eq!(
            m.upload_url(3).unwrap(),
            "https://publisher.example.org/v1/blobs?epochs=3"
        );
        assert_eq!(
            m.download_url("abc"),
            "https://aggregator.example.org/v1/blobs/abc"
        );

        let r = Mirror::relay("relay", "http://localhost:8787/").unwrap();
        assert_eq!(
            r.upload_url(1).unwrap(),
            "http://localhost:8787/api/proxy?epochs=1"
        );
        assert_eq!(r.download_url("abc"), "http://localhost:8787/api/proxy/abc");
    }

    #[test]
    fn test_invalid_urls_rejected() {
        assert!(Mirror::relay("r", "not a url").is_err());
        assert!(Mirror::relay("r", "ftp://example.org").is_err());
        assert!(Mirror::walrus("w", Some("nope"), "https://ok.example").is_err());
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(MirrorSet::new(vec![]).is_err());
    }

    #[test]
    fn test_round_robin_rotation() {
        let set = MirrorSet::new(vec![walrus("a", true), walrus("b", true), walrus("c", true)])
            .unwrap();

        assert_eq!(set.attempt_order(Role::Upload), vec![0, 1, 2]);
        assert_eq!(set.attempt_order(Role::Upload), vec![1, 2, 0]);
        assert_eq!(set.attempt_order(Role::Download), vec![2, 0, 1]);
    }

    #[test]
    fn test_read_only_mirrors_skipped_for_upload() {
        let set = MirrorSet::new(vec![walrus("a", false), walrus("b", true)]).unwrap();

        assert_eq!(set.attempt_order(Role::Upload), vec![1]);
        assert_eq!(set.attempt_order(Role::Download).len(), 2);
    }

    #[test]
    fn test_failed_mirror_moves_to_back() {
        let set = MirrorSet::new(vec![walrus("a", true), walrus("b", true), walrus("c", true)])
            .unwrap();
        set.mark_failed(0);

        assert!(!set.is_healthy(0));
        assert_eq!(set.attempt_order(Role::Download), vec![1, 2, 0]);

        set.mark_healthy(0);
        assert!(set.is_healthy(0));
    }

    #[test]
    fn test_cooldown_expires() {
        let set = MirrorSet::new(vec![walrus("a", true)])
            .unwrap()
            .with_cooldown(Duration::ZERO);
        set.mark_failed(0);
        assert!(set.is_healthy(0));
    }

    #[tokio::test]
    async fn test_try_each_falls_through_to_success() {
        let set = MirrorSet::new(vec![walrus("a", true), walrus("b", true)]).unwrap();

        let result = set
            .try_each(Role::Upload, |mirror| async move {
                if mirror.name() == "a" {
                    Err(StorageError::transport("connection refused"))
                } else {
                    Ok(mirror.name().to_string())
                }
            })
            .await;

        assert_eq!(result.unwrap(), "b");
        assert!(!set.is_healthy(0));
        assert!(set.is_healthy(1));
    }

    #[tokio::test]
    async fn test_try_each_not_found_everywhere() {
        let set = MirrorSet::new(vec![walrus("a", true), walrus("b", true)]).unwrap();

        let result: StorageResult<()> = set
            .try_each(Role::Download, |_| async {
                Err(StorageError::NotFound("abc".into()))
            })
            .await;

        assert!(matches!(result, Err(StorageError::NotFound(_))));
        // 404s are not a health problem
        assert!(set.is_healthy(0) && set.is_healthy(1));
    }

    #[tokio::test]
    async fn test_try_each_stops_on_client_error() {
        let set = MirrorSet::new(vec![walrus("a", true), walrus("b", true)]).unwrap();
        let mut calls = 0;

        let result: StorageResult<()> = set
            .try_each(Role::Upload, |_| {
                calls += 1;
                async {
                    Err(StorageError::Upload {
                        status: 413,
                        message: "too large".into(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(StorageError::Upload { status: 413, .. })));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_try_each_without_publishers() {
        let set = MirrorSet::new(vec![walrus("a", false)]).unwrap();

        let result: StorageResult<()> = set.try_each(Role::Upload, |_| async { Ok(()) }).await;
        assert!(matches!(result, Err(StorageError::NoMirror("uploads"))));
    }
}
