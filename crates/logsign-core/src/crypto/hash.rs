//! BLAKE2b-256 primitives.
//!
//! All hashes in the protocol are unkeyed BLAKE2b with a 32-byte digest.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Hash a list of byte strings as one continuous input.
pub fn hash(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Derive `count` domain-separation constants for `name`.
///
/// ```text
/// ns     = H(name)
/// item_i = H(ns || i)
/// ```
pub fn namespace(name: &str, count: u8) -> Vec<[u8; 32]> {
    let ns = hash(&[name.as_bytes()]);
    (0..count).map(|i| hash(&[&ns, &[i]])).collect()
}
