//! Signing request wire format and validation.
//!
//! # Layout
//!
//! ```text
//! version      uint      (must be 1)
//! length       uint      (must be > 0)
//! fork         uint
//! tree_hash    fixed32
//! manifest     manifest encoding
//! has_blobs    uint8     (may be absent entirely)
//!   blobs.length     uint       (only if has_blobs != 0)
//!   blobs.tree_hash  fixed32
//! ```
//!
//! A decoded request must consume its buffer exactly.

use tracing::{debug, warn};

use crate::crypto::normalize;
use crate::encoding::{Codec, Reader, Sizer, Writer};
use crate::error::{SigningError, SigningResult};
use crate::manifest::Manifest;

/// The only signing request version this crate speaks.
pub const SIGNING_REQUEST_VERSION: u64 = 1;

/// Target state of a drive's attached sub-log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blobs {
    pub length: u64,
    pub tree_hash: [u8; 32],
}

/// A proposed advance of a log to `length` on `fork`.
///
/// `id` and `key` are derived from the manifest on construction and never
/// travel on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    version: u64,
    id: String,
    key: [u8; 32],
    length: u64,
    fork: u64,
    tree_hash: [u8; 32],
    manifest: Manifest,
    blobs: Option<Blobs>,
}

impl SigningRequest {
    /// Fails with [`SigningError::InvalidManifest`] if the manifest would not
    /// survive encoding.
    pub fn new(
        length: u64,
        fork: u64,
        tree_hash: [u8; 32],
        manifest: Manifest,
        blobs: Option<Blobs>,
    ) -> SigningResult<Self> {
        manifest.validate()?;
        let key = manifest.key();
        Ok(Self {
            version: SIGNING_REQUEST_VERSION,
            id: normalize(&key),
            key,
            length,
            fork,
            tree_hash,
            manifest,
            blobs,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Normalized display id of the log key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw log key (manifest hash).
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn fork(&self) -> u64 {
        self.fork
    }

    pub fn tree_hash(&self) -> &[u8; 32] {
        &self.tree_hash
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn blobs(&self) -> Option<&Blobs> {
        self.blobs.as_ref()
    }

    /// True iff the request carries a sub-log section.
    pub fn is_drive(&self) -> bool {
        self.blobs.is_some()
    }

    fn preencode(&self, state: &mut Sizer) {
        state.uint(self.version);
        state.uint(self.length);
        state.uint(self.fork);
        state.fixed32();
        self.manifest.preencode(state);
        state.uint8();
        if let Some(blobs) = &self.blobs {
            state.uint(blobs.length);
            state.fixed32();
        }
    }

    fn encode(&self, state: &mut Writer) {
        state.uint(self.version);
        state.uint(self.length);
        state.uint(self.fork);
        state.fixed32(&self.tree_hash);
        self.manifest.encode(state);
        state.uint8(u8::from(self.blobs.is_some()));
        if let Some(blobs) = &self.blobs {
            state.uint(blobs.length);
            state.fixed32(&blobs.tree_hash);
        }
    }

    fn decode_state(state: &mut Reader<'_>) -> SigningResult<Self> {
        let version = state.uint()?;
        if version != SIGNING_REQUEST_VERSION {
            return Err(SigningError::UnsupportedVersion { version });
        }

        let length = state.uint()?;
        let fork = state.uint()?;
        let tree_hash = state.fixed32()?;
        let manifest = Manifest::decode(state)?;

        // Older requesters omit the flag byte entirely.
        let has_blobs = !state.is_exhausted() && state.uint8()? != 0;
        let blobs = if has_blobs {
            Some(Blobs {
                length: state.uint()?,
                tree_hash: state.fixed32()?,
            })
        } else {
            None
        };

        Self::new(length, fork, tree_hash, manifest, blobs)
    }
}

/// Canonical bytes of `request`.
pub fn encode(request: &SigningRequest) -> Vec<u8> {
    let mut sizer = Sizer::new();
    request.preencode(&mut sizer);

    let mut writer = Writer::with_capacity(sizer.len());
    request.encode(&mut writer);
    debug_assert_eq!(writer.len(), sizer.len(), "preencode and encode disagree");
    writer.into_inner()
}

/// Decode and validate a signing request received from a requester.
///
/// Rejects unknown versions, `length == 0` and any unread trailing bytes.
pub fn decode(buffer: &[u8]) -> SigningResult<SigningRequest> {
    let request = decode_strict(buffer).inspect_err(|err| {
        warn!(len = buffer.len(), error = %err, "rejected signing request");
    })?;

    debug!(
        id = %request.id,
        length = request.length,
        fork = request.fork,
        drive = request.is_drive(),
        "decoded signing request"
    );
    Ok(request)
}

fn decode_strict(buffer: &[u8]) -> SigningResult<SigningRequest> {
    let mut state = Reader::new(buffer);
    let request = SigningRequest::decode_state(&mut state)?;

    if request.length == 0 {
        return Err(SigningError::EmptyLength);
    }
    if !state.is_exhausted() {
        return Err(SigningError::TrailingBytes {
            remaining: state.remaining(),
        });
    }
    Ok(request)
}
