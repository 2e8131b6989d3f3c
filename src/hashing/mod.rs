//! Content hashes used as embedding cache keys.
//!
//! Uses BLAKE3. Keys are full 32-byte digests; [`key_prefix`] gives a short hex form for logs.

use blake3::Hasher;

/// Hashes raw text to a 32-byte BLAKE3 digest.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Hashes `(namespace, text)` into a cache key.
///
/// The namespace identifies the embedding service that produced the vector, so the same text
/// embedded by two different services never shares an entry.
#[inline]
pub fn hash_content(namespace: &str, text: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(namespace.len() as u64).to_le_bytes());
    hasher.update(namespace.as_bytes());
    hasher.update(text.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Returns the first 8 bytes of a key as lowercase hex.
pub fn key_prefix(key: &[u8; 32]) -> String {
    key[..8].iter().map(|b| format!("{:02x}", b)).collect()
}
