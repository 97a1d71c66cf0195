//! Capability constants and the tree signable.
//!
//! The constants are wire-level: both ends of a signing round must derive
//! the same bytes, so the namespace names and their indices never change.

use once_cell::sync::Lazy;

use super::hash::namespace;
use crate::encoding::Writer;

/// Length of a tree signable.
pub const TREE_SIGNABLE_LEN: usize = 112;

/// Bytes a signer signs to authorize a tree state.
pub type TreeSignable = [u8; TREE_SIGNABLE_LEN];

/// Index order: tree, replicate initiator, replicate responder, manifest,
/// default namespace, block encryption.
static LOG_CAPS: Lazy<Vec<[u8; 32]>> = Lazy::new(|| namespace("hypercore", 6));

static DRIVE_CAPS: Lazy<Vec<[u8; 32]>> = Lazy::new(|| namespace("hyperdrive", 1));

/// Prefix of every tree signable.
pub fn tree_cap() -> &'static [u8; 32] {
    &LOG_CAPS[0]
}

/// Prefix of the manifest hash input.
pub fn manifest_cap() -> &'static [u8; 32] {
    &LOG_CAPS[3]
}

/// Namespace assigned to signers that do not declare their own.
pub fn default_namespace() -> &'static [u8; 32] {
    &LOG_CAPS[4]
}

/// Capability class of the attached sub-log ("blobs").
pub fn blobs_cap() -> &'static [u8; 32] {
    &DRIVE_CAPS[0]
}

/// `TREE || namespace || tree_hash || uint64(length) || uint64(fork)`
pub fn tree_signable(
    namespace: &[u8; 32],
    tree_hash: &[u8; 32],
    length: u64,
    fork: u64,
) -> TreeSignable {
    let mut w = Writer::with_capacity(TREE_SIGNABLE_LEN);
    w.fixed32(tree_cap());
    w.fixed32(namespace);
    w.fixed32(tree_hash);
    w.uint64(length);
    w.uint64(fork);

    let mut out = [0u8; TREE_SIGNABLE_LEN];
    out.copy_from_slice(&w.into_inner());
    out
}
