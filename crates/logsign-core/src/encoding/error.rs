//! Codec errors.

/// Structural decode failures.
///
/// These never carry protocol-policy meaning (version acceptance, padding);
/// those live in [`crate::SigningError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The buffer ended before a field was fully read.
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    OutOfBounds { needed: usize, remaining: usize },

    /// An array length prefix exceeds the hard limit.
    #[error("array too large: {len} items (max {max})")]
    ArrayTooLarge { len: u64, max: u64 },

    /// Manifest names a hash algorithm this crate does not know.
    #[error("unknown hash algorithm id: {id}")]
    UnknownHash { id: u64 },

    /// Manifest signer names a signature scheme this crate does not know.
    #[error("unknown signature scheme id: {id}")]
    UnknownSignatureScheme { id: u64 },

    /// Manifest version is neither 0 nor 1.
    #[error("unknown manifest version: {version}")]
    UnknownManifestVersion { version: u64 },

    /// Manifest flags carry bits this crate cannot re-encode.
    #[error("unknown manifest flags: {flags:#x}")]
    UnknownManifestFlags { flags: u64 },

    /// Legacy manifest layout type above 2.
    #[error("unknown manifest type: {kind}")]
    UnknownManifestType { kind: u64 },
}
