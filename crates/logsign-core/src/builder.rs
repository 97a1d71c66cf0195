//! Building signing requests from live log state.
//!
//! The storage engine stays behind the [`Log`] and [`Drive`] traits; this
//! module only awaits their lookups, applies the request preconditions and
//! encodes the result. No retries: a failed lookup is returned as is.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{SigningError, SigningResult};
use crate::manifest::Manifest;
use crate::request::{encode, Blobs, SigningRequest};

/// An append-only log as seen by the request builder.
#[async_trait]
pub trait Log: Send + Sync {
    /// Whether the log has finished loading its current state.
    fn is_opened(&self) -> bool;

    /// Wait until the log has finished loading.
    async fn ready(&self) -> SigningResult<()>;

    fn length(&self) -> u64;

    fn fork(&self) -> u64;

    /// The log's explicit manifest, if it has one.
    fn manifest(&self) -> Option<Manifest>;

    /// True when the log operates under an implicit manifest.
    fn is_compat(&self) -> bool;

    /// Root hash of the content tree at `length`.
    async fn tree_hash(&self, length: u64) -> SigningResult<[u8; 32]>;
}

/// Location of a record's content in the sub-log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobPointer {
    pub block_offset: u64,
    pub block_length: u64,
}

/// A log paired with an attached sub-log ("blobs").
#[async_trait]
pub trait Drive: Send + Sync {
    type Core: Log;

    /// The primary log.
    fn core(&self) -> &Self::Core;

    /// Blob pointer of the index record at `index`, if one exists.
    ///
    /// Callers only ask for `length - 1` of a non-empty log; the index is
    /// expected to hold a live record there.
    async fn record_at(&self, index: u64) -> SigningResult<Option<BlobPointer>>;

    /// Root hash of the sub-log content tree at `length`.
    async fn blobs_tree_hash(&self, length: u64) -> SigningResult<[u8; 32]>;
}

/// Target state for a request. Omitted fields default to the log's current
/// values; the manifest defaults to the log's own.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub length: Option<u64>,
    pub fork: Option<u64>,
    pub manifest: Option<Manifest>,
}

impl GenerateOptions {
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_fork(mut self, fork: u64) -> Self {
        self.fork = Some(fork);
        self
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }
}

struct Target {
    length: u64,
    fork: u64,
    manifest: Manifest,
}

async fn resolve_target<L>(log: &L, options: GenerateOptions) -> SigningResult<Target>
where
    L: Log + ?Sized,
{
    if !log.is_opened() {
        log.ready().await?;
    }

    if log.is_compat() && options.manifest.is_none() {
        return Err(SigningError::ManifestRequired);
    }
    let manifest = options
        .manifest
        .or_else(|| log.manifest())
        .ok_or(SigningError::ManifestRequired)?;
    manifest.validate()?;

    let current_fork = log.fork();
    let fork = options.fork.unwrap_or(current_fork);
    if fork != current_fork {
        return Err(SigningError::ForkMismatch {
            expected: fork,
            actual: current_fork,
        });
    }

    let length = options.length.unwrap_or_else(|| log.length());
    if length == 0 {
        return Err(SigningError::EmptyLength);
    }

    Ok(Target {
        length,
        fork,
        manifest,
    })
}

/// Encode a request to advance `log` to the target state.
///
/// The request never carries a sub-log section, even when `log` is the core
/// of a drive. Drives must use [`generate_drive`] so cosigners also sign the
/// sub-log state.
pub async fn generate<L>(log: &L, options: GenerateOptions) -> SigningResult<Vec<u8>>
where
    L: Log + ?Sized,
{
    let target = resolve_target(log, options).await?;
    let tree_hash = log.tree_hash(target.length).await?;

    let request =
        SigningRequest::new(target.length, target.fork, tree_hash, target.manifest, None)?;
    debug!(
        id = %request.id(),
        length = request.length(),
        fork = request.fork(),
        "generated signing request"
    );
    Ok(encode(&request))
}

/// Encode a request to advance a drive's log and its sub-log together.
///
/// The sub-log length is the end of the blob referenced by the last record
/// the primary log will contain (`block_offset + block_length` at
/// `length - 1`).
pub async fn generate_drive<D>(drive: &D, options: GenerateOptions) -> SigningResult<Vec<u8>>
where
    D: Drive + ?Sized,
{
    let core = drive.core();
    let target = resolve_target(core, options).await?;

    let index = target.length - 1;
    let pointer = drive
        .record_at(index)
        .await?
        .ok_or(SigningError::MissingRecord { index })?;
    let blobs_length = pointer
        .block_offset
        .checked_add(pointer.block_length)
        .ok_or_else(|| SigningError::InvalidRecord {
            index,
            reason: "block offset + block length overflows".to_string(),
        })?;

    let blobs = Blobs {
        length: blobs_length,
        tree_hash: drive.blobs_tree_hash(blobs_length).await?,
    };
    let tree_hash = core.tree_hash(target.length).await?;

    let request = SigningRequest::new(
        target.length,
        target.fork,
        tree_hash,
        target.manifest,
        Some(blobs),
    )?;
    debug!(
        id = %request.id(),
        length = request.length(),
        fork = request.fork(),
        blobs_length,
        "generated drive signing request"
    );
    Ok(encode(&request))
}
