use anyhow::Result;
use blobvault_storage::{Mirror, Network};
use clap::Subcommand;
use colored::Colorize;

use super::Context;
use crate::config::{Config, MirrorEntry};
use crate::output::{print_json, print_success};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Add a Walrus mirror; omit --publisher for a download-only mirror
    AddMirror {
        /// Display name
        name: String,
        /// Aggregator base URL
        aggregator: String,
        /// Publisher base URL
        #[arg(long)]
        publisher: Option<String>,
    },
    /// Remove all configured mirrors and fall back to the network preset
    ClearMirrors,
}

pub async fn run(action: ConfigCommand, ctx: &Context) -> Result<()> {
    match action {
        ConfigCommand::Show => show(ctx).await,
        ConfigCommand::Set { key, value } => set(key, value).await,
        ConfigCommand::AddMirror {
            name,
            aggregator,
            publisher,
        } => add_mirror(name, aggregator, publisher).await,
        ConfigCommand::ClearMirrors => clear_mirrors().await,
    }
}

async fn show(ctx: &Context) -> Result<()> {
    let config = Config::load()?;

    if ctx.json_output {
        return print_json(&config);
    }

    println!("{}", "Configuration:".bold());
    println!(
        "  {}: {}",
        "network".dimmed(),
        config.network.unwrap_or_default()
    );
    println!("    {}", "Valid: testnet, mainnet".bright_black());

    println!(
        "  {}: {}",
        "relay".dimmed(),
        config.relay.as_deref().unwrap_or("(not set)")
    );
    println!("    {}", "Example: http://localhost:8787".bright_black());

    println!("  {}: {}", "epochs".dimmed(), config.epochs.unwrap_or(1));

    if config.mirrors.is_empty() {
        println!("  {}: (network preset)", "mirrors".dimmed());
    } else {
        println!("  {}:", "mirrors".dimmed());
        for m in &config.mirrors {
            println!(
                "    {} {} / {}",
                m.name.cyan(),
                m.publisher.as_deref().unwrap_or("(download only)"),
                m.aggregator
            );
        }
    }

    println!();
    println!("{}", "To set a value:".dimmed());
    println!("  blobvault config set <key> <value>");

    Ok(())
}

async fn set(key: String, value: String) -> Result<()> {
    let mut config = Config::load()?;
    apply(&mut config, &key, &value)?;
    config.save()?;

    print_success(format!("Set {key} = {value}"));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "network" => {
            let network: Network = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            config.network = Some(network);
        }
        "relay" => {
            if value.is_empty() || value == "none" {
                config.relay = None;
            } else {
                Mirror::relay("relay", value)?;
                config.relay = Some(value.to_string());
            }
        }
        "epochs" => {
            let epochs: u32 = value
                .parse()
                .map_err(|_| anyhow::anyhow!("epochs must be a positive integer"))?;
            if epochs == 0 {
                anyhow::bail!("epochs must be at least 1");
            }
            config.epochs = Some(epochs);
        }
        _ => {
            anyhow::bail!(
                "Unknown config key '{key}'.\n\n\
                Valid keys:\n  \
                  network    (testnet or mainnet)\n  \
                  relay      (e.g., http://localhost:8787, or 'none')\n  \
                  epochs     (default storage epochs per upload)"
            );
        }
    }
    Ok(())
}

async fn add_mirror(name: String, aggregator: String, publisher: Option<String>) -> Result<()> {
    // Validates both URLs
    Mirror::walrus(&name, publisher.as_deref(), &aggregator)?;

    let mut config = Config::load()?;
    if config.mirrors.iter().any(|m| m.name == name) {
        anyhow::bail!("Mirror '{name}' already exists");
    }
    config.mirrors.push(MirrorEntry {
        name: name.clone(),
        publisher,
        aggregator,
    });
    config.save()?;

    print_success(format!("Added mirror {name}"));
    Ok(())
}

async fn clear_mirrors() -> Result<()> {
    let mut config = Config::load()?;
    let count = config.mirrors.len();
    config.mirrors.clear();
    config.save()?;

    print_success(format!("Removed {count} mirror(s)"));
    Ok(())
}
