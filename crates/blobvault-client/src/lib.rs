//! Client-side encrypted blob storage on Walrus
//!
//! [`BlobPipeline`] ties the cipher in `blobvault-core` to any
//! `blobvault-storage` backend: read, encrypt, upload on the way in;
//! download, decrypt on the way out. Cipher work runs on the blocking pool.
//!
//! ```no_run
//! use std::sync::Arc;
//! use blobvault_client::BlobPipeline;
//! use blobvault_core::PasswordCipher;
//! use blobvault_storage::{ClientConfig, Network, WalrusClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WalrusClient::new(ClientConfig::for_network(Network::Testnet)?)?;
//! let pipeline = BlobPipeline::new(Arc::new(client), PasswordCipher::default());
//!
//! let uploaded = pipeline.upload_bytes("hello.txt", b"hi".to_vec(), Some("secret")).await?;
//! let data = pipeline.download_file(&uploaded.blob_id, Some("secret")).await?;
//! assert_eq!(data, b"hi");
//! # Ok(())
//! # }
//! ```

mod error;
mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{BlobPipeline, UploadResult};
