use anyhow::{Context as AnyhowContext, Result};
use blobvault_core::PasswordCipher;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::Context;
use super::helpers::{encrypted_path, finish, read_password, spinner};
use crate::output::{print_json, print_success};

#[derive(Args)]
pub struct EncryptArgs {
    /// File to encrypt
    pub file: PathBuf,
    /// Output file (default: <file>.enc)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Encryption password
    #[arg(long, env = "BLOBVAULT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(args: EncryptArgs, ctx: &Context) -> Result<()> {
    let plaintext = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let password = read_password(args.password, true)?;

    let pb = spinner(ctx, "Encrypting...");
    let encrypted = tokio::task::spawn_blocking(move || {
        PasswordCipher::default().encrypt(&plaintext, &password)
    })
    .await?;
    finish(pb);
    let encrypted = encrypted.context("Encryption failed")?;

    let output_path = args.output.unwrap_or_else(|| encrypted_path(&args.file));
    tokio::fs::write(&output_path, encrypted.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if ctx.json_output {
        #[derive(Serialize)]
        struct Output {
            input: String,
            output: String,
            size: usize,
        }
        print_json(&Output {
            input: args.file.display().to_string(),
            output: output_path.display().to_string(),
            size: encrypted.len(),
        })?;
    } else {
        print_success(format!(
            "Encrypted {} → {} ({} bytes)",
            args.file.display(),
            output_path.display(),
            encrypted.len()
        ));
    }

    Ok(())
}
