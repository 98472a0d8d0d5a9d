//! Credential fingerprinting.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

/// Computes the fingerprint of an API key secret: the base64-encoded
/// SHA-256 digest.
///
/// Raw secrets are never stored or logged; every store lookup and cache
/// key goes through this fingerprint. The encoding is stable across
/// process restarts, so externally issued fingerprints keep matching.
pub fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    STANDARD.encode(digest)
}
