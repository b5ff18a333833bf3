//! Blob transport for the Walrus storage network
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`traits`] | [`BlobStore`] trait, [`BlobId`], [`StoredBlob`] |
//! | [`walrus`] | HTTP client against publishers, aggregators, or a relay |
//! | [`mirrors`] | Endpoint list with round-robin failover |
//! | [`network`] | Testnet/mainnet presets |
//! | [`response`] | Publisher response shapes |
//! | [`memory`] | In-memory store for tests |
//!
//! Bytes are treated as opaque. Encryption happens above this layer.

pub mod error;
pub mod memory;
pub mod mirrors;
pub mod network;
pub mod response;
pub mod traits;
pub mod walrus;

pub use error::{
    MAX_ERROR_BODY, StorageError, StorageResult, is_retryable_status, truncate_body,
};
pub use memory::InMemoryBlobStore;
pub use mirrors::{Mirror, MirrorSet, Role};
pub use network::Network;
pub use response::parse_publisher_response;
pub use traits::{BlobId, BlobStatus, BlobStore, StoredBlob};
pub use walrus::{ClientConfig, WalrusClient};
