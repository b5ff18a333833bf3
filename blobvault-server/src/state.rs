use std::sync::Arc;

use crate::config::Config;
use crate::relay::Relay;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let relay = Relay::new(config)?;
        for mirror in relay.mirrors().mirrors() {
            tracing::info!(
                mirror = mirror.name(),
                upload = mirror.can_upload(),
                "Configured upstream"
            );
        }

        Ok(Self {
            relay: Arc::new(relay),
            config: Arc::new(config.clone()),
        })
    }
}
