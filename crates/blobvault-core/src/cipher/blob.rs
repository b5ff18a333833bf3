//! Encrypted blob wire layout

use crate::error::{CryptError, CryptResult};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;
/// IV (GCM nonce) length in bytes
pub const IV_LEN: usize = 16;
/// Fixed header preceding the ciphertext
pub const HEADER_LEN: usize = SALT_LEN + IV_LEN;
/// GCM authentication tag appended to the ciphertext
pub const TAG_LEN: usize = 16;

/// Password-encrypted blob as it is stored on the network
///
/// Layout: `salt(16) || iv(16) || ciphertext || tag(16)`. Construction
/// guarantees the buffer is longer than the 32-byte header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBlob {
    bytes: Vec<u8>,
}

impl EncryptedBlob {
    /// Assemble a blob from its parts
    pub(crate) fn assemble(salt: &[u8; SALT_LEN], iv: &[u8; IV_LEN], sealed: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(HEADER_LEN + sealed.len());
        bytes.extend_from_slice(salt);
        bytes.extend_from_slice(iv);
        bytes.extend_from_slice(sealed);
        Self { bytes }
    }

    /// Wrap bytes fetched from storage, checking only the header length
    pub fn from_bytes(bytes: Vec<u8>) -> CryptResult<Self> {
        check_len(&bytes)?;
        Ok(Self { bytes })
    }

    pub fn salt(&self) -> &[u8] {
        &self.bytes[..SALT_LEN]
    }

    pub fn iv(&self) -> &[u8] {
        &self.bytes[SALT_LEN..HEADER_LEN]
    }

    /// Ciphertext including the trailing tag
    pub fn ciphertext(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for EncryptedBlob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl TryFrom<Vec<u8>> for EncryptedBlob {
    type Error = CryptError;

    fn try_from(bytes: Vec<u8>) -> CryptResult<Self> {
        Self::from_bytes(bytes)
    }
}

impl From<EncryptedBlob> for Vec<u8> {
    fn from(blob: EncryptedBlob) -> Self {
        blob.bytes
    }
}

pub(crate) fn check_len(bytes: &[u8]) -> CryptResult<()> {
    if bytes.len() <= HEADER_LEN {
        return Err(CryptError::MalformedBlob {
            len: bytes.len(),
            header: HEADER_LEN,
        });
    }
    Ok(())
}
