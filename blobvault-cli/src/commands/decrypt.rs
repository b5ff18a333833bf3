use anyhow::{Context as AnyhowContext, Result};
use blobvault_core::{CryptError, PasswordCipher};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::Context;
use super::helpers::{decrypted_path, finish, read_password, spinner};
use crate::output::{print_json, print_success};

#[derive(Args)]
pub struct DecryptArgs {
    /// File to decrypt
    pub file: PathBuf,
    /// Output file (default: strips .enc, else appends .dec)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Decryption password
    #[arg(long, env = "BLOBVAULT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(args: DecryptArgs, ctx: &Context) -> Result<()> {
    let blob = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let password = read_password(args.password, false)?;

    let pb = spinner(ctx, "Decrypting...");
    let plaintext =
        tokio::task::spawn_blocking(move || PasswordCipher::default().decrypt(&blob, &password))
            .await?;
    finish(pb);

    let plaintext = match plaintext {
        Ok(data) => data,
        Err(CryptError::Decryption) => {
            anyhow::bail!("Decryption failed: wrong password or corrupted file")
        }
        Err(e) => return Err(e).context("Decryption failed"),
    };

    let output_path = args.output.unwrap_or_else(|| decrypted_path(&args.file));
    tokio::fs::write(&output_path, &plaintext)
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
            size: plaintext.len(),
        })?;
    } else {
        print_success(format!(
            "Decrypted {} → {} ({} bytes)",
            args.file.display(),
            output_path.display(),
            plaintext.len()
        ));
    }

    Ok(())
}
