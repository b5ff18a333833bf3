//! Walrus network presets

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::mirrors::Mirror;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    /// Public endpoints known to work without credentials
    ///
    /// Mainnet has no public publisher; uploads there need a configured
    /// mirror or relay.
    pub fn default_mirrors(self) -> StorageResult<Vec<Mirror>> {
        match self {
            Network::Testnet => Ok(vec![Mirror::walrus(
                "walrus.space",
                Some("https://publisher.walrus-testnet.walrus.space"),
                "https://aggregator.walrus-testnet.walrus.space",
            )?]),
            Network::Mainnet => Ok(vec![Mirror::walrus(
                "globalstake.io",
                None,
                "https://walrus.globalstake.io",
            )?]),
        }
    }

    /// Wall-clock length of one storage epoch
    pub fn epoch_duration(self) -> Duration {
        match self {
            Network::Testnet => DAY,
            Network::Mainnet => 14 * DAY,
        }
    }

    /// Epochs needed to keep a blob for at least `duration` (minimum one)
    pub fn epochs_for_duration(self, duration: Duration) -> u32 {
        let epoch = self.epoch_duration().as_secs();
        let epochs = duration.as_secs().div_ceil(epoch).max(1);
        u32::try_from(epochs).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => f.write_str("testnet"),
            Network::Mainnet => f.write_str("mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(format!(
                "Unknown network '{other}'. Valid options: 'testnet', 'mainnet'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epochs_round_up() {
        assert_eq!(Network::Testnet.epochs_for_duration(Duration::ZERO), 1);
        assert_eq!(Network::Testnet.epochs_for_duration(DAY), 1);
        assert_eq!(Network::Testnet.epochs_for_duration(DAY + Duration::from_secs(1)), 2);
        assert_eq!(Network::Testnet.epochs_for_duration(30 * DAY), 30);
        assert_eq!(Network::Mainnet.epochs_for_duration(30 * DAY), 3);
    }

    #[test]
    fn test_parse() {
        assert_eq!("TestNet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_presets() {
        let testnet = Network::Testnet.default_mirrors().unwrap();
        assert!(testnet.iter().all(Mirror::can_upload));

        let mainnet = Network::Mainnet.default_mirrors().unwrap();
        assert!(!mainnet.iter().any(Mirror::can_upload));
    }
}
