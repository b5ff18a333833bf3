use std::time::Duration;

use blobvault_storage::{Mirror, Network, StorageResult};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    /// Preset used when `mirrors` is empty
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub mirrors: Vec<MirrorConfig>,

    /// Epochs requested when the client does not say
    #[serde(default = "default_epochs")]
    pub epochs: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Allowed browser origins; empty disables CORS, `"*"` allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MirrorConfig {
    pub name: String,
    pub publisher: Option<String>,
    pub aggregator: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8787
}
fn default_epochs() -> u32 {
    1
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
} // axum's own default is 2 MiB

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            network: Network::default(),
            mirrors: Vec::new(),
            epochs: default_epochs(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config: Config = Figment::new()
            .merge(Toml::file("blobvault-server.toml"))
            .merge(Env::prefixed("BLOBVAULT_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Configured mirrors, or the network preset if none are listed
    pub fn resolve_mirrors(&self) -> StorageResult<Vec<Mirror>> {
        if self.mirrors.is_empty() {
            return self.network.default_mirrors();
        }
        self.mirrors
            .iter()
            .map(|m| Mirror::walrus(&m.name, m.publisher.as_deref(), &m.aggregator))
            .collect()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = Figment::new().extract().unwrap();
        assert_eq!(config.port, 8787);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_mirrors_fall_back_to_network() {
        let config = Config {
            network: Network::Mainnet,
            ..Default::default()
        };
        let mirrors = config.resolve_mirrors().unwrap();
        assert_eq!(mirrors, Network::Mainnet.default_mirrors().unwrap());
    }

    #[test]
    fn test_toml_mirrors() {
        let toml = r#"
            port = 9000
            epochs = 3

            [[mirrors]]
            name = "local"
            publisher = "http://127.0.0.1:31415"
            aggregator = "http://127.0.0.1:31416"
        "#;
        let config: Config = Figment::new()
            .merge(Toml::string(toml))
            .extract()
            .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.epochs, 3);
        let mirrors = config.resolve_mirrors().unwrap();
        assert_eq!(mirrors.len(), 1);
        assert_eq!(
            mirrors[0].download_url("abc"),
            "http://127.0.0.1:31416/v1/blobs/abc"
        );
    }

    #[test]
    fn test_bad_mirror_url_rejected() {
        let config = Config {
            mirrors: vec![MirrorConfig {
                name: "bad".into(),
                publisher: None,
                aggregator: "not a url".into(),
            }],
            ..Default::default()
        };
        assert!(config.resolve_mirrors().is_err());
    }
}
