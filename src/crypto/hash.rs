//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 helpers used for block hashes, transaction
//! signing digests and address derivation, plus the hex-digit
//! difficulty check used by proof of work.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Checks if a hex-encoded hash meets the difficulty target
///
/// The difficulty counts leading `'0'` hex characters, not bits.
pub fn meets_difficulty(hash_hex: &str, difficulty: u32) -> bool {
    let required = difficulty as usize;
    hash_hex.len() >= required && hash_hex.bytes().take(required).all(|c| c == b'0')
}
