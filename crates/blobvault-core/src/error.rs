use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptError {
    #[error("Malformed blob: {len} bytes does not exceed the {header}-byte salt+IV header")]
    MalformedBlob { len: usize, header: usize },

    /// Wrong password, tampered bytes or a truncated ciphertext. GCM cannot
    /// tell these apart, and neither do we.
    #[error("Decryption failed (wrong password or corrupted blob)")]
    Decryption,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Invalid KDF parameters: {0}")]
    InvalidParams(String),
}

pub type CryptResult<T> = Result<T, CryptError>;
