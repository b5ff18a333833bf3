pub mod config;
pub mod decrypt;
pub mod download;
pub mod encrypt;
pub mod helpers;
pub mod upload;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as AnyhowContext;
use blobvault_client::BlobPipeline;
use blobvault_core::PasswordCipher;
use blobvault_storage::{ClientConfig, Network, WalrusClient};

use crate::config::Config;

/// Global context passed to all commands
pub struct Context {
    pub json_output: bool,
    pub network_override: Option<Network>,
    pub relay_override: Option<String>,
    pub timeout_secs: u64,
    pub verbose: bool,
}

impl Context {
    /// Priority: --network flag > $BLOBVAULT_NETWORK > config.network > testnet
    pub fn resolve_network(&self, config: &Config) -> Network {
        self.network_override.or(config.network).unwrap_or_default()
    }

    /// Build a pipeline against the resolved mirrors
    pub fn pipeline(&self, config: &Config, epochs: u32) -> anyhow::Result<BlobPipeline> {
        let mirrors = helpers::resolve_mirrors(self, config)?;
        tracing::debug!(
            mirrors = mirrors.len(),
            epochs,
            timeout_secs = self.timeout_secs,
            "Building pipeline"
        );
        if self.verbose {
            for mirror in &mirrors {
                crate::output::print_info(format!("Using mirror {}", mirror.name()));
            }
        }

        let client_config = ClientConfig::new(mirrors)
            .with_epochs(epochs)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        let client = WalrusClient::new(client_config).context("Failed to build HTTP client")?;

        Ok(BlobPipeline::new(Arc::new(client), PasswordCipher::default()))
    }
}
