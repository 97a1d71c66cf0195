//! Error types for signing requests.

use crate::encoding::CodecError;

/// Signing request errors.
///
/// Every failure aborts the whole operation; nothing partial is returned.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The request speaks a protocol version this crate does not.
    #[error("unknown signing request version: {version}")]
    UnsupportedVersion { version: u64 },

    /// Bytes were left over after a complete request was decoded.
    #[error("unparsed padding left in request: {remaining} trailing bytes")]
    TrailingBytes { remaining: usize },

    /// The request targets (or decodes to) an empty log.
    #[error("refusing to sign length = 0")]
    EmptyLength,

    /// The requested fork is not the log's current fork.
    #[error("fork mismatch: log is on fork {actual}, request asked for {expected}")]
    ForkMismatch { expected: u64, actual: u64 },

    /// No manifest was supplied and the log cannot provide one.
    #[error("cannot generate signing requests for compat logs without an explicit manifest")]
    ManifestRequired,

    /// The public key is not listed in the manifest's signers.
    #[error("public key is not a declared signer for this request: {public_key}")]
    UnauthorizedSigner { public_key: String },

    /// Blob signing was requested for a request without a sub-log section.
    #[error("request does not specify a drive")]
    NotADrive,

    /// Blob signing was requested under a legacy (v0) manifest.
    #[error("drive must use v1 manifests")]
    LegacyManifest,

    /// A key string could not be parsed.
    #[error("invalid key: {reason}")]
    InvalidKey { reason: String },

    /// The manifest cannot be encoded without losing fields.
    #[error("invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    /// The request envelope is structurally malformed.
    #[error("malformed request: {0}")]
    Codec(#[from] CodecError),

    /// The drive index holds no record at the given position.
    #[error("no index record at {index}")]
    MissingRecord { index: u64 },

    /// The drive index record cannot describe a sub-log length.
    #[error("invalid index record at {index}: {reason}")]
    InvalidRecord { index: u64, reason: String },

    /// The log or storage engine failed a lookup.
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl SigningError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Peers disagree on the message shape
            Self::UnsupportedVersion { .. } => 1,
            Self::TrailingBytes { .. } => 1,
            Self::Codec(_) => 1,
            Self::EmptyLength => 1,
            Self::InvalidKey { .. } => 1,
            Self::InvalidManifest { .. } => 1,

            // Request policy
            Self::ForkMismatch { .. } => 2,
            Self::ManifestRequired => 2,

            Self::UnauthorizedSigner { .. } => 3,

            // Capability preconditions
            Self::NotADrive => 4,
            Self::LegacyManifest => 4,

            // Storage collaborators
            Self::MissingRecord { .. } => 5,
            Self::InvalidRecord { .. } => 5,
            Self::Storage { .. } => 5,
        }
    }

    /// Whether retrying at a higher level can help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

/// Result type for signing request operations.
pub type SigningResult<T> = Result<T, SigningError>;
