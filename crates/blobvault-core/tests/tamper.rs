//! Tamper detection and salt/IV freshness

use std::collections::HashSet;

use blobvault_core::{CryptError, PasswordCipher, decrypt, encrypt};

#[test]
fn test_every_single_byte_flip_detected() {
    let cipher = PasswordCipher::default();
    let blob = cipher.encrypt(b"tamper me", "secret").unwrap();

    for i in 0..blob.len() {
        let mut tampered = blob.as_bytes().to_vec();
        tampered[i] ^= 0x01;

        assert_eq!(
            cipher.decrypt(&tampered, "secret"),
            Err(CryptError::Decryption),
            "flip at byte {i} went unnoticed"
        );
    }
}

#[test]
fn test_salt_and_iv_never_reused() {
    const TRIALS: usize = 64;

    let mut salts = HashSet::new();
    let mut ivs = HashSet::new();

    for _ in 0..TRIALS {
        let blob = encrypt(b"same input every time", "same password").unwrap();
        salts.insert(blob.salt().to_vec());
        ivs.insert(blob.iv().to_vec());
    }

    assert_eq!(salts.len(), TRIALS);
    assert_eq!(ivs.len(), TRIALS);
}

#[test]
fn test_same_input_yields_distinct_blobs() {
    let a = encrypt(b"payload", "secret").unwrap();
    let b = encrypt(b"payload", "secret").unwrap();

    assert_ne!(a, b);
    assert_eq!(decrypt(a.as_bytes(), "secret").unwrap(), b"payload");
    assert_eq!(decrypt(b.as_bytes(), "secret").unwrap(), b"payload");
}

#[test]
fn test_ten_byte_scenario() {
    let original: Vec<u8> = (1..=10).collect();

    let blob = encrypt(&original, "secret").unwrap();
    assert_eq!(decrypt(blob.as_bytes(), "secret").unwrap(), original);
}
