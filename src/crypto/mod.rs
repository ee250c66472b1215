//! Cryptographic utilities for the multisig engine
//!
//! This module provides:
//! - SHA-256 hashing and base58check address rendering
//! - ECDSA member credentials (secp256k1): key generation, signing,
//!   signature verification

pub mod hash;
pub mod keys;

pub use hash::{base58check, sha256, sha256_hex};
pub use keys::{
    public_key_from_hex, public_key_to_address, sign_digest, verify_signature, KeyError, KeyPair,
};
