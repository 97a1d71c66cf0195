//! Signing requests for append-only logs.
//!
//! A log owner asks remote cosigners to authorize advancing the log to a new
//! length on its current fork. This crate provides:
//!
//! - the canonical binary request format (encode / strict decode)
//! - request construction from live log state ([`generate`], [`generate_drive`])
//! - derivation of the exact bytes each declared signer must sign
//!   ([`signable`], [`blob_signable`])
//!
//! Transport, signature creation and storage live elsewhere; the storage
//! engine is reached only through the [`Log`] and [`Drive`] traits.
//!
//! # Quick Start
//!
//! ```
//! use logsign_core::{blob_signable, decode, signable, SigningError};
//!
//! fn cosign(bytes: &[u8], my_key: &[u8; 32]) -> Result<Vec<u8>, SigningError> {
//!     let request = decode(bytes)?;
//!     let mut payload = signable(my_key, &request)?.to_vec();
//!     if request.is_drive() {
//!         payload.extend_from_slice(&blob_signable(my_key, &request)?);
//!     }
//!     Ok(payload)
//! }
//! ```

pub mod builder;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod manifest;
pub mod request;
pub mod signable;

pub use builder::{generate, generate_drive, BlobPointer, Drive, GenerateOptions, Log};
pub use crypto::{decode_key, normalize, TreeSignable, TREE_SIGNABLE_LEN};
pub use error::{SigningError, SigningResult};
pub use manifest::{manifest_hash, Manifest, ManifestVersion, Prologue, Signer};
pub use request::{decode, encode, Blobs, SigningRequest, SIGNING_REQUEST_VERSION};
pub use signable::{blob_signable, signable};
