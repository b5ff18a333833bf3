use anyhow::{Context as AnyhowContext, Result};
use blobvault_storage::BlobId;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::Context;
use super::helpers::{finish, read_password, spinner};
use crate::config::Config;
use crate::output::{print_json, print_success};

#[derive(Args)]
pub struct DownloadArgs {
    /// Blob ID returned by upload
    pub blob_id: String,
    /// Output file
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Decrypt after downloading (prompts for a password)
    #[arg(long)]
    pub decrypt: bool,
    /// Decryption password; implies --decrypt
    #[arg(long, env = "BLOBVAULT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(args: DownloadArgs, ctx: &Context) -> Result<()> {
    let blob_id = BlobId::parse(args.blob_id.as_str())?;
    let config = Config::load()?;

    let password = if args.decrypt || args.password.is_some() {
        Some(read_password(args.password, false)?)
    } else {
        None
    };

    let pipeline = ctx.pipeline(&config, 1)?;

    let pb = spinner(ctx, "Downloading...");
    let data = pipeline
        .download_file(&blob_id, password.as_deref().map(String::as_str))
        .await;
    finish(pb);
    let data = data.with_context(|| format!("Failed to download {blob_id}"))?;

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{blob_id}.bin")));
    tokio::fs::write(&output_path, &data)
        .await
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if ctx.json_output {
        #[derive(Serialize)]
        struct Output {
            blob_id: String,
            output: String,
            size: usize,
            decrypted: bool,
        }
        print_json(&Output {
            blob_id: blob_id.to_string(),
            output: output_path.display().to_string(),
            size: data.len(),
            decrypted: password.is_some(),
        })?;
    } else {
        print_success(format!(
            "Downloaded {blob_id} → {} ({} bytes)",
            output_path.display(),
            data.len()
        ));
    }

    Ok(())
}
