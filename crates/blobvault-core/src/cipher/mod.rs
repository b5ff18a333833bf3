//! PBKDF2 + AES-256-GCM password encryption

mod blob;
mod kdf;

pub use blob::{EncryptedBlob, HEADER_LEN, IV_LEN, SALT_LEN, TAG_LEN};
pub use kdf::{DEFAULT_ITERATIONS, KEY_LEN, KdfParams, MIN_ITERATIONS};

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};
use rand::{RngCore, rngs::OsRng};

use crate::error::{CryptError, CryptResult};

/// AES-256-GCM with a 128-bit nonce, matching the 16-byte IV in the layout
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Password-based blob cipher
///
/// Cheap to clone and free of I/O. Key derivation is deliberately slow, so
/// async callers should run it on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordCipher {
    params: KdfParams,
}

impl PasswordCipher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Encrypt `plaintext` under `password` with a fresh salt and IV
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> CryptResult<EncryptedBlob> {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let key = self.params.derive_key(password, &salt);
        let cipher = Aes256Gcm16::new((&*key).into());
        let sealed = cipher
            .encrypt(Nonce::<U16>::from_slice(&iv), plaintext)
            .map_err(|e| CryptError::Encryption(e.to_string()))?;

        Ok(EncryptedBlob::assemble(&salt, &iv, &sealed))
    }

    /// Decrypt raw blob bytes as fetched from storage
    pub fn decrypt(&self, blob: &[u8], password: &str) -> CryptResult<Vec<u8>> {
        blob::check_len(blob)?;

        let (salt, rest) = blob.split_at(SALT_LEN);
        let (iv, sealed) = rest.split_at(IV_LEN);

        let key = self.params.derive_key(password, salt);
        let cipher = Aes256Gcm16::new((&*key).into());
        cipher
            .decrypt(Nonce::<U16>::from_slice(iv), sealed)
            .map_err(|_| CryptError::Decryption)
    }

    /// Decrypt an already-validated blob
    pub fn decrypt_blob(&self, blob: &EncryptedBlob, password: &str) -> CryptResult<Vec<u8>> {
        self.decrypt(blob.as_bytes(), password)
    }
}

/// Encrypt with the default parameters
pub fn encrypt(plaintext: &[u8], password: &str) -> CryptResult<EncryptedBlob> {
    PasswordCipher::default().encrypt(plaintext, password)
}

/// Decrypt with the default parameters
pub fn decrypt(blob: &[u8], password: &str) -> CryptResult<Vec<u8>> {
    PasswordCipher::default().decrypt(blob, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = PasswordCipher::default();
        let plaintext = b"Hello, password encryption!";

        let blob = cipher.encrypt(plaintext, "secret").unwrap();
        let decrypted = cipher.decrypt(blob.as_bytes(), "secret").unwrap();

        assert_eq!(&decrypted[..], plaintext);
    }

    #[test]
    fn test_blob_length() {
        let blob = encrypt(&[0u8; 100], "secret").unwrap();
        assert_eq!(blob.len(), HEADER_LEN + 100 + TAG_LEN);
    }

    #[test]
    fn test_empty_plaintext_still_exceeds_header() {
        let blob = encrypt(b"", "secret").unwrap();
        assert_eq!(blob.len(), HEADER_LEN + TAG_LEN);
        assert!(decrypt(blob.as_bytes(), "secret").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_password_fails() {
        let blob = encrypt(b"top secret", "correct-password").unwrap();
        let result = decrypt(blob.as_bytes(), "wrong-password");
        assert_eq!(result, Err(CryptError::Decryption));
    }

    #[test]
    fn test_short_input_is_malformed() {
        for len in [0, 1, 16, HEADER_LEN] {
            let result = decrypt(&vec![0u8; len], "secret");
            assert!(
                matches!(result, Err(CryptError::MalformedBlob { .. })),
                "length {len} should be malformed"
            );
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let blob = encrypt(b"some longer plaintext body", "secret").unwrap();
        let truncated = &blob.as_bytes()[..blob.len() - 1];
        assert_eq!(decrypt(truncated, "secret"), Err(CryptError::Decryption));

        let header_plus_one = &blob.as_bytes()[..HEADER_LEN + 1];
        assert_eq!(decrypt(header_plus_one, "secret"), Err(CryptError::Decryption));
    }

    #[test]
    fn test_mismatched_iterations_fail() {
        let strong = PasswordCipher::new(KdfParams::new(200_000).unwrap());
        let blob = strong.encrypt(b"payload", "secret").unwrap();

        assert_eq!(
            PasswordCipher::default().decrypt_blob(&blob, "secret"),
            Err(CryptError::Decryption)
        );
        assert_eq!(strong.decrypt_blob(&blob, "secret").unwrap(), b"payload");
    }
}
