//! PBKDF2 key derivation

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CryptError, CryptResult};

/// Iteration count used when nothing else is configured
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Anything below this is refused outright
pub const MIN_ITERATIONS: u32 = 100_000;

/// Derived key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 parameters
///
/// The iteration count is not recorded in the blob, so both sides of a
/// round-trip must agree on it out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
}

impl KdfParams {
    pub fn new(iterations: u32) -> CryptResult<Self> {
        if iterations < MIN_ITERATIONS {
            return Err(CryptError::InvalidParams(format!(
                "{iterations} PBKDF2 iterations is below the minimum of {MIN_ITERATIONS}"
            )));
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive a 256-bit key from `password` and `salt`
    pub fn derive_key(&self, password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, self.iterations, key.as_mut());
        key
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_low_iteration_count() {
        let result = KdfParams::new(1_000);
        assert!(matches!(result, Err(CryptError::InvalidParams(_))));
    }

    #[test]
    fn test_accepts_tuned_iteration_count() {
        let params = KdfParams::new(250_000).unwrap();
        assert_eq!(params.iterations(), 250_000);
    }

    #[test]
    fn test_derive_key_deterministic() {
        let params = KdfParams::default();
        let salt = [0x42u8; 16];

        let key1 = params.derive_key("password", &salt);
        let key2 = params.derive_key("password", &salt);
        assert_eq!(*key1, *key2);

        let key3 = params.derive_key("different", &salt);
        assert_ne!(*key1, *key3);

        let key4 = params.derive_key("password", &[0x43u8; 16]);
        assert_ne!(*key1, *key4);
    }

    #[test]
    fn test_known_vector() {
        // RFC 7914 section 11: PBKDF2-HMAC-SHA256("passwd", "salt", c=1, dkLen=64).
        // Checked directly against the primitive since KdfParams refuses c=1.
        let mut out = [0u8; 64];
        pbkdf2_hmac::<Sha256>(b"passwd", b"salt", 1, &mut out);
        assert_eq!(
            &out[..8],
            &[0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f]
        );
    }
}
