// Config file handling

use anyhow::Result;
use blobvault_storage::Network;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
    pub network: Option<Network>,
    pub relay: Option<String>,
    pub epochs: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<MirrorEntry>,
}

/// A Walrus publisher/aggregator pair; no publisher means download-only
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MirrorEntry {
    pub name: String,
    pub publisher: Option<String>,
    pub aggregator: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        // Uses platform-specific config directories:
        //   macOS:   ~/Library/Application Support/io.blobvault.blobvault/
        //   Linux:   ~/.config/blobvault/
        //   Windows: C:\Users\<user>\AppData\Roaming\blobvault\blobvault\
        let dirs = ProjectDirs::from("io", "blobvault", "blobvault")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
