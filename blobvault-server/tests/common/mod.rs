//! Relay test server in front of fake Walrus upstreams

use std::net::SocketAddr;

use blobvault_server::config::{Config, MirrorConfig};
use blobvault_testkit::serve;

pub use blobvault_testkit::FakeWalrus;

pub struct TestServer {
    pub url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
}

impl TestServer {
    /// Relay forwarding to `upstreams` in order
    pub async fn start(upstreams: &[&str]) -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0, // OS assigns port
            mirrors: upstreams
                .iter()
                .enumerate()
                .map(|(i, url)| MirrorConfig {
                    name: format!("upstream-{i}"),
                    publisher: Some(url.to_string()),
                    aggregator: url.to_string(),
                })
                .collect(),
            request_timeout_secs: 5,
            max_body_bytes: 64 * 1024,
            ..Default::default()
        };
        Self::start_with(config).await
    }

    pub async fn start_with(config: Config) -> Self {
        let state = blobvault_server::state::AppState::new(&config).unwrap();
        let app = blobvault_server::routes::router(state);
        let (url, addr) = serve(app).await;
        Self { url, addr }
    }
}
