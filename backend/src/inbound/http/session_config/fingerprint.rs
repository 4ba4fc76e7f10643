//! Truncated SHA-256 fingerprint of the session signing key.
//!
//! Logged at startup so operators can tell which key a process runs with
//! without the key material ever reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Fingerprint length before hex encoding.
pub const FINGERPRINT_BYTES: usize = 8;

/// First [`FINGERPRINT_BYTES`] bytes of the SHA-256 digest of the signing
/// key, hex encoded.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use docvault::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let key = Key::generate();
/// let fp = key_fingerprint(&key);
///
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
