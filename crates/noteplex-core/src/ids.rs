//! Random identifier generation and digest helpers.
//!
//! Public note ids, invitation hashes, and file keys are short random
//! strings over a fixed alphanumeric charset. Bearer tokens are longer
//! strings from the same charset, stored only as SHA-256 digests.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::defaults;

/// Charset for all generated identifiers: `[A-Za-z0-9]`.
pub const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random string of the given length from [`ID_CHARSET`].
pub fn random_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..ID_CHARSET.len());
            ID_CHARSET[idx] as char
        })
        .collect()
}

/// Generate a public note identifier.
pub fn generate_public_id() -> String {
    random_id(defaults::PUBLIC_ID_LENGTH)
}

/// Generate an invitation hash. Same length and charset as public ids;
/// regeneration always produces a value indistinguishable in shape from
/// the one it replaces.
pub fn generate_invitation_hash() -> String {
    random_id(defaults::INVITATION_HASH_LENGTH)
}

/// Generate a file access key.
pub fn generate_file_key() -> String {
    random_id(defaults::FILE_KEY_LENGTH)
}

/// Generate a bearer token.
pub fn generate_token() -> String {
    random_id(defaults::AUTH_TOKEN_LENGTH)
}

/// SHA-256 digest as lowercase hex. Used for token storage so raw
/// tokens never land in the database.
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}
