//! Hashing and address rendering
//!
//! SHA-256 digests are used for transaction digests and address
//! derivation; base58check renders derived addresses in a compact,
//! checksummed form.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Render a payload as a base58check address
///
/// Address = Base58(version || RIPEMD160(SHA256(payload)) || checksum)
/// where checksum is the first 4 bytes of the double SHA-256 of the
/// versioned hash.
pub fn base58check(version: u8, payload: &[u8]) -> String {
    let sha256_hash = sha256(payload);

    let mut ripemd = Ripemd160::new();
    ripemd.update(&sha256_hash);
    let ripemd_hash = ripemd.finalize();

    let mut address_bytes = vec![version];
    address_bytes.extend_from_slice(&ripemd_hash);

    let checksum = {
        let first_hash = Sha256::digest(&address_bytes);
        let second_hash = Sha256::digest(first_hash);
        second_hash[..4].to_vec()
    };
    address_bytes.extend_from_slice(&checksum);

    bs58::encode(address_bytes).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let data = b"hello world";
        let hash = sha256(data);
        assert_eq!(hash.len(), 32);
        assert_eq!(
            sha256_hex(data),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_base58check_deterministic() {
        let a = base58check(0x05, b"payload");
        let b = base58check(0x05, b"payload");
        assert_eq!(a, b);

        // Different version byte changes the address
        let c = base58check(0x00, b"payload");
        assert_ne!(a, c);
    }

    #[test]
    fn test_base58check_version_prefix() {
        // Version 0x05 produces P2SH-style addresses starting with '3'
        let address = base58check(0x05, b"some payload");
        assert!(address.starts_with('3'));

        // Version 0x00 produces addresses starting with '1'
        let address = base58check(0x00, b"some payload");
        assert!(address.starts_with('1'));
    }
}
