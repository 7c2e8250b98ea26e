// src/utils/identifiers.rs
//! Generation of certificate identifiers, simulated IPFS CIDs and simulated
//! blockchain hashes.
//!
//! All random material comes from a caller-supplied `CryptoRng`; the registry
//! passes `OsRng`. Identifiers are therefore not guessable from earlier ones.

use crate::models::certificate::NewCertificate;
use crate::utils::crypto::{hash_data, to_prefixed_hex};
use chrono::{DateTime, Utc};
use rand::{CryptoRng, Rng, RngCore};

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of the random suffix of a certificate id.
pub const ID_SUFFIX_LEN: usize = 9;
/// Number of base58 characters following the `Qm` prefix of a CIDv0.
pub const CID_BODY_LEN: usize = 44;

fn random_chars<R: RngCore>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Builds a certificate id of the form `CERT-<unix millis>-<9 base36 chars>`.
pub fn certificate_id<R: RngCore + CryptoRng>(rng: &mut R, now: DateTime<Utc>) -> String {
    format!(
        "CERT-{}-{}",
        now.timestamp_millis(),
        random_chars(rng, BASE36, ID_SUFFIX_LEN)
    )
}

/// Builds a CIDv0-shaped content identifier (`Qm` + 44 base58 characters).
///
/// Nothing is uploaded; the value only stands in for a real CID.
pub fn ipfs_cid<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    format!("Qm{}", random_chars(rng, BASE58, CID_BODY_LEN))
}

/// Builds the simulated blockchain hash of a newly issued certificate.
///
/// Keccak-256 over the certificate content, its id and a 32-byte random
/// nonce, rendered as `0x` + 64 lowercase hex characters.
pub fn blockchain_hash<R: RngCore + CryptoRng>(
    rng: &mut R,
    input: &NewCertificate,
    id: &str,
) -> String {
    let mut nonce = [0u8; 32];
    rng.fill_bytes(&mut nonce);

    let mut preimage = Vec::with_capacity(128);
    for field in [&input.student_id, &input.student_name, &input.specialization] {
        preimage.extend_from_slice(field.as_bytes());
        preimage.push(0);
    }
    preimage.extend_from_slice(&input.graduation_year.to_be_bytes());
    preimage.extend_from_slice(id.as_bytes());
    preimage.extend_from_slice(&nonce);

    to_prefixed_hex(&hash_data(&preimage))
}

/// Returns true if `id` has the shape produced by [`certificate_id`].
#[cfg(test)]
pub fn is_generated_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '-');
    let (Some("CERT"), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == ID_SUFFIX_LEN
        && suffix.bytes().all(|b| BASE36.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_certificate_id_shape() {
        let id = certificate_id(&mut OsRng, Utc::now());
        assert!(is_generated_id(&id), "unexpected id {}", id);
        assert!(!is_generated_id("CERT-2024-001"));
        assert!(!is_generated_id("CERT-abc-ABCDEFGHI"));
    }

    #[test]
    fn test_ipfs_cid_shape() {
        let cid = ipfs_cid(&mut OsRng);
        assert_eq!(cid.len(), 2 + CID_BODY_LEN);
        assert!(cid.starts_with("Qm"));
        assert!(cid[2..].bytes().all(|b| BASE58.contains(&b)));
    }

    #[test]
    fn test_blockchain_hash_shape_and_nonce() {
        let input = NewCertificate::new("Jane Doe", "STU-1", "CS", 2025);
        let first = blockchain_hash(&mut OsRng, &input, "CERT-1");
        let second = blockchain_hash(&mut OsRng, &input, "CERT-1");

        let hex = first.strip_prefix("0x").unwrap();
        assert_eq!(hex.len(), 64);
        assert!(hex.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
