//! Signable derivation.
//!
//! Produces the exact bytes a declared signer must sign for a request. The
//! namespace fed into the tree signable depends on the manifest version:
//!
//! | manifest | log signable namespace  | blob signable namespace           |
//! |----------|-------------------------|-----------------------------------|
//! | v0       | signer's own namespace  | unsupported                       |
//! | v1       | request key             | `H(BLOBS || key || signer ns)`    |
//!
//! Pure functions: no I/O, and failures are never retryable.

use crate::crypto::caps::blobs_cap;
use crate::crypto::{hash, tree_signable, TreeSignable};
use crate::error::{SigningError, SigningResult};
use crate::manifest::{ManifestVersion, Signer};
use crate::request::SigningRequest;

fn declared_signer<'a>(
    public_key: &[u8; 32],
    request: &'a SigningRequest,
) -> SigningResult<&'a Signer> {
    request
        .manifest()
        .find_signer(public_key)
        .ok_or_else(|| SigningError::UnauthorizedSigner {
            public_key: hex::encode(public_key),
        })
}

/// Bytes `public_key` must sign to authorize the log state in `request`.
pub fn signable(public_key: &[u8; 32], request: &SigningRequest) -> SigningResult<TreeSignable> {
    let signer = declared_signer(public_key, request)?;

    let namespace = match request.manifest().version {
        ManifestVersion::V0 => &signer.namespace,
        ManifestVersion::V1 => request.key(),
    };

    Ok(tree_signable(
        namespace,
        request.tree_hash(),
        request.length(),
        request.fork(),
    ))
}

/// Bytes `public_key` must sign to authorize the sub-log state in `request`.
pub fn blob_signable(
    public_key: &[u8; 32],
    request: &SigningRequest,
) -> SigningResult<TreeSignable> {
    let blobs = request.blobs().ok_or(SigningError::NotADrive)?;

    match request.manifest().version {
        ManifestVersion::V0 => Err(SigningError::LegacyManifest),
        ManifestVersion::V1 => {
            let signer = declared_signer(public_key, request)?;
            let namespace = hash(&[blobs_cap(), request.key(), &signer.namespace]);
            Ok(tree_signable(
                &namespace,
                &blobs.tree_hash,
                blobs.length,
                request.fork(),
            ))
        }
    }
}
