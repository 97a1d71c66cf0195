//! Signer manifests.
//!
//! A manifest names the keys allowed to cosign a log. Its hash is the log's
//! key, so the encoding here is part of the trust root and must stay
//! byte-compatible with every peer.
//!
//! ```text
//! v0: version=0 | hash_id | type
//!       type 0: prologue.hash                      (no signers)
//!       type 1: signer                             (quorum 1, no patch)
//!       type 2: flags | quorum | signer[]
//! v1: version=1 | flags | hash_id | quorum | signer[] | [prologue]
//!
//! signer:   scheme_id | namespace(32) | public_key(32)
//! prologue: hash(32) | length
//! flags:    bit0 = allow_patch, bit1 = prologue present (v1 only)
//! ```

use crate::crypto::caps::{default_namespace, manifest_cap};
use crate::crypto::hash;
use crate::encoding::{self, Codec, CodecError, Reader, Sizer, Writer};
use crate::error::{SigningError, SigningResult};

const FLAG_ALLOW_PATCH: u64 = 1;
const FLAG_PROLOGUE: u64 = 2;

// The key is the hash of the re-encoded manifest, so any bit dropped on
// decode would change it.
const V0_KNOWN_FLAGS: u64 = FLAG_ALLOW_PATCH;
const V1_KNOWN_FLAGS: u64 = FLAG_ALLOW_PATCH | FLAG_PROLOGUE;

const V0_TYPE_PROLOGUE: u64 = 0;
const V0_TYPE_SINGLE: u64 = 1;
const V0_TYPE_MULTI: u64 = 2;

/// Manifest format version.
///
/// Closed on purpose: version-dependent derivations match on it exhaustively,
/// so a new version cannot silently take the legacy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ManifestVersion {
    V0,
    V1,
}

impl ManifestVersion {
    pub fn as_u64(self) -> u64 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }

    pub fn from_u64(version: u64) -> Result<Self, CodecError> {
        match version {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            _ => Err(CodecError::UnknownManifestVersion { version }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Blake2b,
}

impl HashAlgorithm {
    fn id(self) -> u64 {
        match self {
            Self::Blake2b => 0,
        }
    }

    fn from_id(id: u64) -> Result<Self, CodecError> {
        match id {
            0 => Ok(Self::Blake2b),
            _ => Err(CodecError::UnknownHash { id }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureScheme {
    #[default]
    Ed25519,
}

impl SignatureScheme {
    fn id(self) -> u64 {
        match self {
            Self::Ed25519 => 0,
        }
    }

    fn from_id(id: u64) -> Result<Self, CodecError> {
        match id {
            0 => Ok(Self::Ed25519),
            _ => Err(CodecError::UnknownSignatureScheme { id }),
        }
    }
}

/// One authorized cosigner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    pub signature: SignatureScheme,
    pub namespace: [u8; 32],
    pub public_key: [u8; 32],
}

impl Signer {
    /// Ed25519 signer in the default namespace.
    pub fn ed25519(public_key: [u8; 32]) -> Self {
        Self {
            signature: SignatureScheme::Ed25519,
            namespace: *default_namespace(),
            public_key,
        }
    }

    pub fn with_namespace(mut self, namespace: [u8; 32]) -> Self {
        self.namespace = namespace;
        self
    }
}

impl Codec for Signer {
    fn preencode(&self, state: &mut Sizer) {
        state.uint(self.signature.id());
        state.fixed32();
        state.fixed32();
    }

    fn encode(&self, state: &mut Writer) {
        state.uint(self.signature.id());
        state.fixed32(&self.namespace);
        state.fixed32(&self.public_key);
    }

    fn decode(state: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            signature: SignatureScheme::from_id(state.uint()?)?,
            namespace: state.fixed32()?,
            public_key: state.fixed32()?,
        })
    }
}

/// Tree state the log was seeded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prologue {
    pub hash: [u8; 32],
    pub length: u64,
}

impl Codec for Prologue {
    fn preencode(&self, state: &mut Sizer) {
        state.fixed32();
        state.uint(self.length);
    }

    fn encode(&self, state: &mut Writer) {
        state.fixed32(&self.hash);
        state.uint(self.length);
    }

    fn decode(state: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            hash: state.fixed32()?,
            length: state.uint()?,
        })
    }
}

/// Signer policy of a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: ManifestVersion,
    pub hash_algorithm: HashAlgorithm,
    pub allow_patch: bool,
    pub quorum: u64,
    pub signers: Vec<Signer>,
    pub prologue: Option<Prologue>,
}

impl Manifest {
    /// v1 manifest with a single Ed25519 signer.
    pub fn single_signer(public_key: [u8; 32]) -> Self {
        Self::multisig(1, vec![Signer::ed25519(public_key)])
    }

    /// v1 manifest requiring `quorum` of `signers`.
    pub fn multisig(quorum: u64, signers: Vec<Signer>) -> Self {
        Self {
            version: ManifestVersion::V1,
            hash_algorithm: HashAlgorithm::Blake2b,
            allow_patch: false,
            quorum,
            signers,
            prologue: None,
        }
    }

    pub fn with_version(mut self, version: ManifestVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_prologue(mut self, prologue: Prologue) -> Self {
        self.prologue = Some(prologue);
        self
    }

    /// Check that the manifest survives an encode/decode round trip.
    ///
    /// v1 encodes every field. The v0 layouts cannot hold a prologue next to
    /// signers, nor a prologue length, quorum or patch flag on a
    /// prologue-only manifest.
    pub fn validate(&self) -> SigningResult<()> {
        let invalid = |reason: &str| -> SigningResult<()> {
            Err(SigningError::InvalidManifest {
                reason: reason.to_string(),
            })
        };

        match (self.version, &self.prologue) {
            (ManifestVersion::V1, _) | (ManifestVersion::V0, None) => Ok(()),
            (ManifestVersion::V0, Some(_)) if !self.signers.is_empty() => {
                invalid("v0 manifests cannot combine a prologue with signers")
            }
            (ManifestVersion::V0, Some(prologue)) if prologue.length != 0 => {
                invalid("v0 prologues carry no length")
            }
            (ManifestVersion::V0, Some(_)) if self.quorum != 0 || self.allow_patch => {
                invalid("v0 prologue manifests carry no quorum or patch flag")
            }
            (ManifestVersion::V0, Some(_)) => Ok(()),
        }
    }

    /// The log key this manifest commits to.
    ///
    /// Only stable across peers for manifests that pass [`Manifest::validate`].
    pub fn key(&self) -> [u8; 32] {
        manifest_hash(self)
    }

    /// First signer declaring `public_key`.
    pub fn find_signer(&self, public_key: &[u8; 32]) -> Option<&Signer> {
        self.signers.iter().find(|s| &s.public_key == public_key)
    }

    fn v0_type(&self) -> u64 {
        if self.prologue.is_some() && self.signers.is_empty() {
            V0_TYPE_PROLOGUE
        } else if self.quorum == 1 && self.signers.len() == 1 && !self.allow_patch {
            V0_TYPE_SINGLE
        } else {
            V0_TYPE_MULTI
        }
    }

    fn v1_flags(&self) -> u64 {
        let mut flags = 0;
        if self.allow_patch {
            flags |= FLAG_ALLOW_PATCH;
        }
        if self.prologue.is_some() {
            flags |= FLAG_PROLOGUE;
        }
        flags
    }

    fn decode_v0(state: &mut Reader<'_>) -> Result<Self, CodecError> {
        let hash_algorithm = HashAlgorithm::from_id(state.uint()?)?;
        let kind = state.uint()?;

        let base = Self {
            version: ManifestVersion::V0,
            hash_algorithm,
            allow_patch: false,
            quorum: 0,
            signers: Vec::new(),
            prologue: None,
        };

        match kind {
            V0_TYPE_PROLOGUE => Ok(Self {
                prologue: Some(Prologue {
                    hash: state.fixed32()?,
                    length: 0,
                }),
                ..base
            }),
            V0_TYPE_SINGLE => Ok(Self {
                quorum: 1,
                signers: vec![Signer::decode(state)?],
                ..base
            }),
            V0_TYPE_MULTI => {
                let flags = state.uint()?;
                if flags & !V0_KNOWN_FLAGS != 0 {
                    return Err(CodecError::UnknownManifestFlags { flags });
                }
                Ok(Self {
                    allow_patch: flags & FLAG_ALLOW_PATCH != 0,
                    quorum: state.uint()?,
                    signers: state.array()?,
                    ..base
                })
            }
            kind => Err(CodecError::UnknownManifestType { kind }),
        }
    }

    fn decode_v1(state: &mut Reader<'_>) -> Result<Self, CodecError> {
        let flags = state.uint()?;
        if flags & !V1_KNOWN_FLAGS != 0 {
            return Err(CodecError::UnknownManifestFlags { flags });
        }
        let hash_algorithm = HashAlgorithm::from_id(state.uint()?)?;
        let quorum = state.uint()?;
        let signers = state.array()?;
        let prologue = if flags & FLAG_PROLOGUE != 0 {
            Some(Prologue::decode(state)?)
        } else {
            None
        };

        Ok(Self {
            version: ManifestVersion::V1,
            hash_algorithm,
            allow_patch: flags & FLAG_ALLOW_PATCH != 0,
            quorum,
            signers,
            prologue,
        })
    }
}

impl Codec for Manifest {
    fn preencode(&self, state: &mut Sizer) {
        state.uint(self.version.as_u64());
        match self.version {
            ManifestVersion::V0 => {
                let kind = self.v0_type();
                state.uint(self.hash_algorithm.id());
                state.uint(kind);
                match (kind, &self.prologue) {
                    (V0_TYPE_PROLOGUE, Some(_)) => state.fixed32(),
                    (V0_TYPE_SINGLE, _) => self.signers[0].preencode(state),
                    _ => {
                        state.uint(u64::from(self.allow_patch));
                        state.uint(self.quorum);
                        state.array(&self.signers);
                    }
                }
            }
            ManifestVersion::V1 => {
                state.uint(self.v1_flags());
                state.uint(self.hash_algorithm.id());
                state.uint(self.quorum);
                state.array(&self.signers);
                if let Some(prologue) = &self.prologue {
                    prologue.preencode(state);
                }
            }
        }
    }

    fn encode(&self, state: &mut Writer) {
        state.uint(self.version.as_u64());
        match self.version {
            ManifestVersion::V0 => {
                let kind = self.v0_type();
                state.uint(self.hash_algorithm.id());
                state.uint(kind);
                match (kind, &self.prologue) {
                    (V0_TYPE_PROLOGUE, Some(prologue)) => state.fixed32(&prologue.hash),
                    (V0_TYPE_SINGLE, _) => self.signers[0].encode(state),
                    _ => {
                        state.uint(u64::from(self.allow_patch));
                        state.uint(self.quorum);
                        state.array(&self.signers);
                    }
                }
            }
            ManifestVersion::V1 => {
                state.uint(self.v1_flags());
                state.uint(self.hash_algorithm.id());
                state.uint(self.quorum);
                state.array(&self.signers);
                if let Some(prologue) = &self.prologue {
                    prologue.encode(state);
                }
            }
        }
    }

    fn decode(state: &mut Reader<'_>) -> Result<Self, CodecError> {
        match ManifestVersion::from_u64(state.uint()?)? {
            ManifestVersion::V0 => Self::decode_v0(state),
            ManifestVersion::V1 => Self::decode_v1(state),
        }
    }
}

/// `H(MANIFEST || encode(manifest))`
pub fn manifest_hash(manifest: &Manifest) -> [u8; 32] {
    let encoded = encoding::to_vec(manifest);
    hash(&[manifest_cap(), &encoded])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_signers() -> Vec<Signer> {
        vec![
            Signer::ed25519([0x01; 32]).with_namespace([0xa1; 32]),
            Signer::ed25519([0x02; 32]).with_namespace([0xa2; 32]),
        ]
    }

    fn roundtrip(m: &Manifest) -> Manifest {
        let bytes = encoding::to_vec(m);
        let mut reader = Reader::new(&bytes);
        let decoded = Manifest::decode(&mut reader).unwrap();
        assert!(reader.is_exhausted());
        decoded
    }

    #[test]
    fn v1_multisig_golden_bytes_and_key() {
        let m = Manifest::multisig(1, two_signers());
        let bytes = encoding::to_vec(&m);
        assert_eq!(&bytes[..5], &[0x01, 0x00, 0x00, 0x01, 0x02]);
        assert_eq!(bytes.len(), 5 + 2 * 65);
        assert_eq!(
            hex::encode(m.key()),
            "5a608b9a64e1add095865b1fdadee50a3e24f2b4c61986c585fdfd1d296d8f75"
        );
        assert_eq!(roundtrip(&m), m);
    }

    #[test]
    fn v0_multisig_golden_key() {
        let m = Manifest::multisig(1, two_signers()).with_version(ManifestVersion::V0);
        let bytes = encoding::to_vec(&m);
        assert_eq!(&bytes[..6], &[0x00, 0x00, 0x02, 0x00, 0x01, 0x02]);
        assert_eq!(
            hex::encode(m.key()),
            "e8550be1c46541c0207e851f45beb157d45718e898307f394bdb5cf7a2e84969"
        );
        assert_eq!(roundtrip(&m), m);
    }

    #[test]
    fn single_signer_default_namespace_key() {
        let m = Manifest::single_signer([0x01; 32]);
        assert_eq!(
            hex::encode(m.key()),
            "1ec23a2b047862aa88526b18b8c0c096f6438ecf2a652410ca55c35259dc6e4d"
        );
    }

    #[test]
    fn v0_single_signer_uses_compact_type() {
        let m = Manifest::single_signer([0x07; 32]).with_version(ManifestVersion::V0);
        let bytes = encoding::to_vec(&m);
        assert_eq!(&bytes[..3], &[0x00, 0x00, V0_TYPE_SINGLE as u8]);
        assert_eq!(bytes.len(), 3 + 65);
        assert_eq!(roundtrip(&m), m);
    }

    #[test]
    fn v0_prologue_only() {
        let m = Manifest::multisig(0, Vec::new())
            .with_version(ManifestVersion::V0)
            .with_prologue(Prologue {
                hash: [0x44; 32],
                length: 0,
            });
        let bytes = encoding::to_vec(&m);
        assert_eq!(bytes.len(), 3 + 32);
        assert_eq!(roundtrip(&m), m);
    }

    #[test]
    fn v1_prologue_and_patch_flags() {
        let mut m = Manifest::multisig(2, two_signers()).with_prologue(Prologue {
            hash: [0x55; 32],
            length: 300,
        });
        m.allow_patch = true;
        let bytes = encoding::to_vec(&m);
        assert_eq!(bytes[1], (FLAG_ALLOW_PATCH | FLAG_PROLOGUE) as u8);
        assert_eq!(roundtrip(&m), m);
    }

    #[test]
    fn rejects_unknown_version_and_ids() {
        let mut reader = Reader::new(&[0x02]);
        assert_eq!(
            Manifest::decode(&mut reader).unwrap_err(),
            CodecError::UnknownManifestVersion { version: 2 }
        );

        let mut reader = Reader::new(&[0x01, 0x00, 0x05]);
        assert_eq!(
            Manifest::decode(&mut reader).unwrap_err(),
            CodecError::UnknownHash { id: 5 }
        );

        let mut reader = Reader::new(&[0x00, 0x00, 0x03]);
        assert_eq!(
            Manifest::decode(&mut reader).unwrap_err(),
            CodecError::UnknownManifestType { kind: 3 }
        );
    }

    #[test]
    fn find_signer_returns_first_match() {
        let mut signers = two_signers();
        signers.push(Signer::ed25519([0x01; 32]).with_namespace([0xff; 32]));
        let m = Manifest::multisig(1, signers);
        let found = m.find_signer(&[0x01; 32]).unwrap();
        assert_eq!(found.namespace, [0xa1; 32]);
        assert!(m.find_signer(&[0x03; 32]).is_none());
    }

    #[test]
    fn rejects_flag_bits_it_cannot_reencode() {
        let mut v1 = encoding::to_vec(&Manifest::single_signer([0x01; 32]));
        v1[1] = 0x04;
        assert_eq!(
            Manifest::decode(&mut Reader::new(&v1)).unwrap_err(),
            CodecError::UnknownManifestFlags { flags: 0x04 }
        );

        let v0 = Manifest::multisig(2, two_signers()).with_version(ManifestVersion::V0);
        let mut bytes = encoding::to_vec(&v0);
        assert_eq!(&bytes[..4], &[0x00, 0x00, V0_TYPE_MULTI as u8, 0x00]);
        bytes[3] = (FLAG_ALLOW_PATCH | FLAG_PROLOGUE) as u8;
        assert_eq!(
            Manifest::decode(&mut Reader::new(&bytes)).unwrap_err(),
            CodecError::UnknownManifestFlags { flags: 0x03 }
        );
    }

    #[test]
    fn known_flag_bits_still_decode() {
        let mut m = Manifest::multisig(2, two_signers()).with_version(ManifestVersion::V0);
        m.allow_patch = true;
        assert_eq!(roundtrip(&m), m);
    }

    #[test]
    fn validate_rejects_v0_states_the_layout_drops() {
        let prologue = Prologue {
            hash: [0x44; 32],
            length: 0,
        };

        let with_signer = Manifest::single_signer([0x01; 32])
            .with_version(ManifestVersion::V0)
            .with_prologue(prologue.clone());
        assert!(matches!(
            with_signer.validate(),
            Err(SigningError::InvalidManifest { .. })
        ));

        let with_length = Manifest::multisig(0, Vec::new())
            .with_version(ManifestVersion::V0)
            .with_prologue(Prologue {
                length: 9,
                ..prologue.clone()
            });
        assert!(with_length.validate().is_err());

        let with_quorum = Manifest::multisig(1, Vec::new())
            .with_version(ManifestVersion::V0)
            .with_prologue(prologue.clone());
        assert!(with_quorum.validate().is_err());

        let prologue_only = Manifest::multisig(0, Vec::new())
            .with_version(ManifestVersion::V0)
            .with_prologue(prologue.clone());
        prologue_only.validate().unwrap();

        // v1 carries every field
        let v1 = Manifest::single_signer([0x01; 32]).with_prologue(Prologue {
            length: 9,
            ..prologue
        });
        v1.validate().unwrap();
        assert_eq!(roundtrip(&v1), v1);
    }
}
