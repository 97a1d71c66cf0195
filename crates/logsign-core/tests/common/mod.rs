//! In-memory log and drive collaborators for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use logsign_core::crypto::hash;
use logsign_core::{BlobPointer, Drive, Log, Manifest, Signer, SigningError, SigningResult};

/// Deterministic test key (DO NOT USE IN PRODUCTION).
pub fn test_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

pub fn public_key(key: &SigningKey) -> [u8; 32] {
    key.verifying_key().to_bytes()
}

/// v1 manifest requiring one of the given keys.
pub fn manifest_for(keys: &[&SigningKey]) -> Manifest {
    Manifest::multisig(
        1,
        keys.iter()
            .enumerate()
            .map(|(i, k)| Signer::ed25519(public_key(k)).with_namespace([0xa0 + i as u8; 32]))
            .collect(),
    )
}

/// Append-only log whose tree hash is a running hash of its blocks.
pub struct MemoryLog {
    blocks: Mutex<Vec<Vec<u8>>>,
    fork: u64,
    manifest: Option<Manifest>,
    compat: bool,
}

impl MemoryLog {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            blocks: Mutex::new(Vec::new()),
            fork: 0,
            manifest: Some(manifest),
            compat: false,
        }
    }

    /// A log with no explicit manifest.
    pub fn compat() -> Self {
        Self {
            blocks: Mutex::new(Vec::new()),
            fork: 0,
            manifest: None,
            compat: true,
        }
    }

    pub fn with_fork(mut self, fork: u64) -> Self {
        self.fork = fork;
        self
    }

    pub fn append(&self, block: &[u8]) {
        self.blocks.lock().unwrap().push(block.to_vec());
    }

    pub fn append_many(&self, count: usize) {
        for i in 0..count {
            self.append(format!("block-{i}").as_bytes());
        }
    }
}

#[async_trait]
impl Log for MemoryLog {
    fn is_opened(&self) -> bool {
        true
    }

    async fn ready(&self) -> SigningResult<()> {
        Ok(())
    }

    fn length(&self) -> u64 {
        self.blocks.lock().unwrap().len() as u64
    }

    fn fork(&self) -> u64 {
        self.fork
    }

    fn manifest(&self) -> Option<Manifest> {
        self.manifest.clone()
    }

    fn is_compat(&self) -> bool {
        self.compat
    }

    async fn tree_hash(&self, length: u64) -> SigningResult<[u8; 32]> {
        let blocks = self.blocks.lock().unwrap();
        if length > blocks.len() as u64 {
            return Err(SigningError::storage(format!(
                "length {length} beyond log end {}",
                blocks.len()
            )));
        }
        Ok(blocks[..length as usize]
            .iter()
            .fold([0u8; 32], |acc, block| hash(&[&acc, block])))
    }
}

/// A drive: the primary log holds index records, the blob store holds content.
pub struct MemoryDrive {
    core: MemoryLog,
    records: Mutex<Vec<BlobPointer>>,
    blobs: Mutex<Vec<u8>>,
}

impl MemoryDrive {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            core: MemoryLog::new(manifest),
            records: Mutex::new(Vec::new()),
            blobs: Mutex::new(Vec::new()),
        }
    }

    /// Store a file: its bytes go to the blob store, a pointer to the index.
    pub fn put(&self, path: &str, content: &[u8]) {
        let mut blobs = self.blobs.lock().unwrap();
        let pointer = BlobPointer {
            block_offset: blobs.len() as u64,
            block_length: content.len() as u64,
        };
        blobs.extend_from_slice(content);
        self.records.lock().unwrap().push(pointer);
        self.core.append(path.as_bytes());
    }

    pub fn blobs_len(&self) -> u64 {
        self.blobs.lock().unwrap().len() as u64
    }
}

#[async_trait]
impl Drive for MemoryDrive {
    type Core = MemoryLog;

    fn core(&self) -> &MemoryLog {
        &self.core
    }

    async fn record_at(&self, index: u64) -> SigningResult<Option<BlobPointer>> {
        Ok(self.records.lock().unwrap().get(index as usize).copied())
    }

    async fn blobs_tree_hash(&self, length: u64) -> SigningResult<[u8; 32]> {
        let blobs = self.blobs.lock().unwrap();
        if length > blobs.len() as u64 {
            return Err(SigningError::storage("blob length beyond store end"));
        }
        Ok(hash(&[b"blobs", &blobs[..length as usize]]))
    }
}
