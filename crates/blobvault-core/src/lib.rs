//! # blobvault-core: password-based blob encryption
//!
//! Encrypts arbitrary byte buffers under a human password before they leave
//! the machine for the Walrus storage network.
//!
//! ## Scheme
//!
//! - **KDF**: PBKDF2-HMAC-SHA256, 100 000 iterations by default, 16-byte salt
//! - **Cipher**: AES-256-GCM with a 16-byte IV (authenticated, tamper-evident)
//! - **Layout**: `salt(16) || iv(16) || ciphertext || tag(16)`
//!
//! Salt and IV are drawn from the OS CSPRNG on every call, so encrypting the
//! same buffer twice never yields the same blob.
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let blob = blobvault_core::encrypt(b"Hello, Walrus!", "hunter2")?;
//! let plaintext = blobvault_core::decrypt(blob.as_bytes(), "hunter2")?;
//! assert_eq!(plaintext, b"Hello, Walrus!");
//!
//! assert!(blobvault_core::decrypt(blob.as_bytes(), "wrong").is_err());
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod error;

pub use cipher::{
    DEFAULT_ITERATIONS, EncryptedBlob, KdfParams, MIN_ITERATIONS, PasswordCipher, decrypt,
    encrypt,
};
pub use error::{CryptError, CryptResult};
