//! Test doubles shared by the storage and relay suites
//!
//! [`FakeWalrus`] speaks the publisher/aggregator HTTP API on a random local
//! port. Blob ids are the URL-safe base64 BLAKE3 digest of the content, so a
//! repeated upload answers with `alreadyCertified`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

/// Certifying tx digest reported for duplicate uploads
pub const CERTIFIED_TX_DIGEST: &str = "4Lb2tXDigest";

/// Shared state behind a [`FakeWalrus`]; cheap to clone
#[derive(Clone, Default)]
pub struct Upstream {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    /// Answer every request with 500
    pub failing: Arc<AtomicBool>,
    failure_body: Arc<Mutex<Option<String>>>,
    pub uploads: Arc<AtomicUsize>,
    pub downloads: Arc<AtomicUsize>,
    pub last_epochs: Arc<AtomicUsize>,
}

impl Upstream {
    /// Fail every request from now on with the default error bodies
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Fail every request with `body` as the 500 response text
    pub fn fail_with(&self, body: impl Into<String>) {
        *lock(&self.failure_body) = Some(body.into());
        self.fail();
    }

    fn failure(&self, default: &'static str) -> Option<Response> {
        if !self.failing.load(Ordering::SeqCst) {
            return None;
        }
        let body = lock(&self.failure_body)
            .clone()
            .unwrap_or_else(|| default.to_string());
        Some((StatusCode::INTERNAL_SERVER_ERROR, body).into_response())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Deserialize)]
struct StoreQuery {
    epochs: Option<usize>,
}

async fn store(
    State(up): State<Upstream>,
    Query(query): Query<StoreQuery>,
    body: Bytes,
) -> Response {
    up.uploads.fetch_add(1, Ordering::SeqCst);
    if let Some(failure) = up.failure("publisher unavailable") {
        return failure;
    }
    up.last_epochs.store(query.epochs.unwrap_or(0), Ordering::SeqCst);

    let hash = blake3::hash(&body);
    let blob_id = URL_SAFE_NO_PAD.encode(hash.as_bytes());
    let mut blobs = lock(&up.blobs);

    let response = if blobs.contains_key(&blob_id) {
        json!({
            "alreadyCertified": {
                "blobId": blob_id,
                "endEpoch": 99,
                "event": { "txDigest": CERTIFIED_TX_DIGEST, "eventSeq": "0" }
            }
        })
    } else {
        blobs.insert(blob_id.clone(), body.to_vec());
        json!({
            "newlyCreated": {
                "blobObject": {
                    "id": format!("0x{}", hash.to_hex()),
                    "blobId": blob_id,
                    "size": body.len(),
                    "storage": { "startEpoch": 1, "endEpoch": 2 }
                },
                "cost": 1000
            }
        })
    };

    axum::Json(response).into_response()
}

async fn fetch(State(up): State<Upstream>, Path(blob_id): Path<String>) -> Response {
    up.downloads.fetch_add(1, Ordering::SeqCst);
    if let Some(failure) = up.failure("aggregator unavailable") {
        return failure;
    }
    match lock(&up.blobs).get(&blob_id) {
        Some(data) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            data.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "blob not found").into_response(),
    }
}

/// Serve `app` on `127.0.0.1:0` and return its base URL
pub async fn serve(app: Router) -> (String, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    // Give server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    (format!("http://{addr}"), addr)
}

/// In-process Walrus publisher and aggregator on one port
pub struct FakeWalrus {
    pub url: String,
    pub addr: SocketAddr,
    pub upstream: Upstream,
}

impl FakeWalrus {
    pub async fn start() -> Self {
        let upstream = Upstream::default();
        let app = Router::new()
            .route("/v1/blobs", put(store))
            .route("/v1/blobs/{blob_id}", get(fetch))
            .with_state(upstream.clone());

        let (url, addr) = serve(app).await;

        Self {
            url,
            addr,
            upstream,
        }
    }
}

/// Base URL nothing listens on
pub const DEAD_URL: &str = "http://127.0.0.1:1";
