// src/utils/crypto.rs
//! Cryptographic utilities for certificate digests and administrator passwords.
//!
//! - Keccak-256 (Ethereum's standard hash function) for certificate digests
//! - PBKDF2-HMAC-SHA256 (via `ring`) for salted password hashes

use crate::error::{RegistryError, Result};
use ethers::utils::{hex, keccak256};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Scheme tag stored at the start of every password hash string.
const PASSWORD_SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = 32;

/// Computes a Keccak-256 hash of the input data (Ethereum-compatible).
///
/// # Arguments
/// * `data` - Binary data to hash (as bytes slice)
///
/// # Returns
/// Fixed-size 32-byte array (`[u8; 32]`) containing the hash.
pub fn hash_data(data: &[u8]) -> [u8; 32] {
    keccak256(data)
}

/// Formats a digest as a `0x`-prefixed lowercase hex string.
pub fn to_prefixed_hex(digest: &[u8]) -> String {
    format!("0x{}", hex::encode(digest))
}

/// Derives the certificate hash from the student's identity fields.
///
/// The fields are joined with `:` before hashing, so the same student,
/// name and department always produce the same hash.
///
/// # Returns
/// `0x` followed by 64 lowercase hex characters.
pub fn certificate_hash(student_id: &str, student_name: &str, department: &str) -> String {
    let preimage = format!("{}:{}:{}", student_id, student_name, department);
    to_prefixed_hex(&hash_data(preimage.as_bytes()))
}

/// Fills a buffer with bytes from the system CSPRNG.
pub fn random_bytes(buf: &mut [u8]) -> Result<()> {
    SystemRandom::new().fill(buf)?;
    Ok(())
}

/// Hashes a password with a fresh random salt.
///
/// # Returns
/// A self-describing string `pbkdf2-sha256$<iterations>$<salt>$<hash>`
/// with salt and hash base64-encoded.
///
/// # Errors
/// - `InvalidConfig` if `iterations` is zero
/// - `Crypto` if the system RNG fails
pub fn hash_password(password: &str, iterations: u32) -> Result<String> {
    let rounds = NonZeroU32::new(iterations)
        .ok_or_else(|| RegistryError::InvalidConfig("pbkdf2 iterations must be non-zero".into()))?;

    let mut salt = [0u8; SALT_LEN];
    random_bytes(&mut salt)?;

    let mut derived = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(PBKDF2_ALG, rounds, &salt, password.as_bytes(), &mut derived);

    Ok(format!(
        "{}${}${}${}",
        PASSWORD_SCHEME,
        iterations,
        base64::encode(salt),
        base64::encode(derived)
    ))
}

/// Returns a well-formed password hash that no password matches.
///
/// Checking against it costs the same PBKDF2 work as checking a real
/// account, so unknown usernames take as long as wrong passwords.
pub fn unmatchable_password_hash(iterations: u32) -> String {
    format!(
        "{}${}${}${}",
        PASSWORD_SCHEME,
        iterations,
        base64::encode([0u8; SALT_LEN]),
        base64::encode([0u8; CREDENTIAL_LEN])
    )
}

/// Checks a password against a string produced by [`hash_password`].
///
/// Malformed hash strings never verify. Comparison of the derived key is
/// constant-time (done inside `ring`).
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != PASSWORD_SCHEME {
        return false;
    }
    let Some(rounds) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (base64::decode(salt), base64::decode(expected)) else {
        return false;
    };

    pbkdf2::verify(PBKDF2_ALG, rounds, &salt, password.as_bytes(), &expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_hash_is_deterministic() {
        let first = certificate_hash("STU-1", "Jane Doe", "CS");
        let second = certificate_hash("STU-1", "Jane Doe", "CS");
        assert_eq!(first, second);
        assert_eq!(first.len(), 66);
        assert!(first.starts_with("0x"));
        assert_ne!(first, certificate_hash("STU-2", "Jane Doe", "CS"));
    }

    #[test]
    fn test_password_round_trip() {
        let stored = hash_password("correct horse", 1_000).unwrap();
        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("battery staple", &stored));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("secret", 1_000).unwrap();
        let b = hash_password("secret", 1_000).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hashes_never_verify() {
        assert!(!verify_password("secret", ""));
        assert!(!verify_password("secret", "secret"));
        assert!(!verify_password("secret", "pbkdf2-sha256$0$AAAA$AAAA"));
        assert!(!verify_password("secret", "md5$1000$AAAA$AAAA"));
    }

    #[test]
    fn test_unmatchable_hash_is_well_formed() {
        let stored = unmatchable_password_hash(1_000);
        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert_eq!(stored.split('$').count(), 4);
        assert!(!verify_password("", &stored));
        assert!(!verify_password("secret", &stored));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(matches!(
            hash_password("secret", 0),
            Err(RegistryError::InvalidConfig(_))
        ));
    }
}
