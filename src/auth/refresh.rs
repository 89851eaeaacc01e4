//! Opaque refresh tokens
//!
//! A refresh token is 32 random bytes, hex encoded. Only its SHA-256 digest
//! is persisted, so a leaked users table does not leak usable tokens.

use rand::RngCore;
use sha2::{Digest, Sha256};

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically secure refresh token
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a refresh token for storage and lookup
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
