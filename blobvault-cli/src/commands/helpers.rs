// Common helper functions

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as AnyhowContext, Result};
use blobvault_storage::{Mirror, Network};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use zeroize::Zeroizing;

use super::Context;
use crate::config::Config;

const DAY_SECS: u64 = 24 * 60 * 60;

/// Priority: --relay > $BLOBVAULT_RELAY > config.relay > config.mirrors > network preset
pub fn resolve_mirrors(ctx: &Context, config: &Config) -> Result<Vec<Mirror>> {
    if let Some(relay) = ctx.relay_override.as_deref().or(config.relay.as_deref()) {
        let mirror = Mirror::relay("relay", relay).with_context(|| format!("Bad relay URL {relay}"))?;
        return Ok(vec![mirror]);
    }

    if !config.mirrors.is_empty() {
        return config
            .mirrors
            .iter()
            .map(|m| {
                Mirror::walrus(&m.name, m.publisher.as_deref(), &m.aggregator)
                    .with_context(|| format!("Bad mirror '{}' in config", m.name))
            })
            .collect();
    }

    let network = ctx.resolve_network(config);
    Ok(network.default_mirrors()?)
}

/// Priority: --epochs > --days > config.epochs > 1
pub fn resolve_epochs(
    epochs: Option<u32>,
    days: Option<u64>,
    network: Network,
    config: &Config,
) -> u32 {
    if let Some(epochs) = epochs {
        return epochs.max(1);
    }
    if let Some(days) = days {
        return network.epochs_for_duration(Duration::from_secs(days.saturating_mul(DAY_SECS)));
    }
    config.epochs.unwrap_or(1).max(1)
}

/// Use the given password, or prompt for one
///
/// `confirm` asks twice; use it when encrypting so a typo doesn't lock the
/// data away.
pub fn read_password(provided: Option<String>, confirm: bool) -> Result<Zeroizing<String>> {
    if let Some(password) = provided {
        if password.is_empty() {
            anyhow::bail!("Password must not be empty");
        }
        return Ok(Zeroizing::new(password));
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    let password = Zeroizing::new(prompt.interact()?);
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}

/// Spinner on stderr, hidden in JSON mode
pub fn spinner(ctx: &Context, message: &str) -> Option<ProgressBar> {
    if ctx.json_output {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

pub fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

/// `file.enc` for encryption output
pub fn encrypted_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".enc");
    PathBuf::from(name)
}

/// Strip `.enc` if present, otherwise append `.dec`
pub fn decrypted_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == "enc") {
        return input.with_extension("");
    }
    let mut name = input.as_os_str().to_owned();
    name.push(".dec");
    PathBuf::from(name)
}
