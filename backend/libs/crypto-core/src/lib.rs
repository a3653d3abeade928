//! Shared crypto helpers: JWT handling and random identifiers.

pub mod jwt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};

/// Number of random bytes behind a storage object identifier
pub const OBJECT_ID_BYTES: usize = 32;

/// Fill `len` bytes from the OS RNG
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Random URL-safe identifier (unpadded base64url of `num_bytes` random bytes).
///
/// Safe to use as a path segment or object key.
pub fn random_url_safe_id(num_bytes: usize) -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(num_bytes))
}
