use anyhow::{Context as AnyhowContext, Result};
use blobvault_storage::BlobStatus;
use clap::Args;
use std::path::PathBuf;

use super::Context;
use super::helpers::{finish, read_password, resolve_epochs, spinner};
use crate::config::Config;
use crate::output::{print_field, print_json, print_success};

#[derive(Args)]
pub struct UploadArgs {
    /// File to upload
    pub file: PathBuf,
    /// Encrypt before uploading (prompts for a password)
    #[arg(long)]
    pub encrypt: bool,
    /// Encryption password; implies --encrypt
    #[arg(long, env = "BLOBVAULT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Storage epochs to pay for
    #[arg(long, conflicts_with = "days")]
    pub epochs: Option<u32>,
    /// Minimum retention in days, rounded up to whole epochs
    #[arg(long)]
    pub days: Option<u64>,
}

pub async fn run(args: UploadArgs, ctx: &Context) -> Result<()> {
    let config = Config::load()?;
    let network = ctx.resolve_network(&config);
    let epochs = resolve_epochs(args.epochs, args.days, network, &config);

    let password = if args.encrypt || args.password.is_some() {
        Some(read_password(args.password, true)?)
    } else {
        None
    };

    let pipeline = ctx.pipeline(&config, epochs)?;

    let pb = spinner(ctx, "Uploading...");
    let result = pipeline
        .upload_file(&args.file, password.as_deref().map(String::as_str))
        .await;
    finish(pb);
    let result = result.with_context(|| format!("Failed to upload {}", args.file.display()))?;

    if ctx.json_output {
        print_json(&result)?;
    } else {
        let verb = match result.status {
            BlobStatus::NewlyCreated => "Uploaded",
            BlobStatus::AlreadyCertified => "Already stored",
        };
        print_success(format!("{verb} {}", result.file_name));
        print_field("Blob ID", &result.blob_id);
        print_field("URL", &result.blob_url);
        print_field("Sui ref", &result.storage_ref);
        if let Some(end) = result.end_epoch {
            print_field("End epoch", end);
        }
        print_field("Encrypted", if result.encrypted { "yes" } else { "no" });
        print_field("Size", format!("{} bytes", result.size));
    }

    Ok(())
}
