use anyhow::Result;
use blobvault_storage::Network;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "blobvault")]
#[command(about = "Client-side encrypted file storage on Walrus")]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(long, global = true)]
    json: bool,

    /// Walrus network: "testnet" (default) or "mainnet"
    #[arg(long, global = true, env = "BLOBVAULT_NETWORK")]
    network: Option<Network>,

    /// Send traffic through a blobvault relay instead of Walrus directly
    #[arg(long, global = true, env = "BLOBVAULT_RELAY")]
    relay: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    timeout: u64,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "BLOBVAULT_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, optionally encrypting it first
    Upload(commands::upload::UploadArgs),
    /// Download a blob, optionally decrypting it
    Download(commands::download::DownloadArgs),
    /// Encrypt a file locally
    Encrypt(commands::encrypt::EncryptArgs),
    /// Decrypt a file locally
    Decrypt(commands::decrypt::DecryptArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("blobvault=debug,blobvault_client=debug,blobvault_storage=debug")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = commands::Context {
        json_output: cli.json,
        network_override: cli.network,
        relay_override: cli.relay,
        timeout_secs: cli.timeout,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Upload(args) => commands::upload::run(args, &ctx).await,
        Commands::Download(args) => commands::download::run(args, &ctx).await,
        Commands::Encrypt(args) => commands::encrypt::run(args, &ctx).await,
        Commands::Decrypt(args) => commands::decrypt::run(args, &ctx).await,
        Commands::Config { action } => commands::config::run(action, &ctx).await,
    }
}
