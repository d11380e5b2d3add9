use std::fmt::Display;

use ipld_core::cid::{Cid, multihash::Multihash};
use sha1::{Digest as _, Sha1};
use thiserror::Error;

use crate::codec::{DecodeError, encode_digest_as_hex};

/// Multicodec code of SHA-1 multihashes.
pub const SHA1_CODE: u64 = 0x11;
pub const SHA1_LEN: usize = 20;

/// Multicodec code of raw Git objects.
pub const GIT_RAW: u64 = 0x78;
/// Multicodec code of SWHID v1 snapshots.
pub const SWHID_1_SNP: u64 = 0x01f0;

pub type Digest = [u8; SHA1_LEN];

/// Hash functions the archive can be queried with.
///
/// The archive only indexes Git-compatible SHA-1 hashes, so this is the only variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
}

impl HashAlgorithm {
    pub fn from_code(code: u64) -> Result<Self, DecodeError> {
        match code {
            SHA1_CODE => Ok(Self::Sha1),
            other => Err(DecodeError::WrongAlgorithm(other)),
        }
    }

    pub fn code(&self) -> u64 {
        match self {
            Self::Sha1 => SHA1_CODE,
        }
    }

    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha1 => SHA1_LEN,
        }
    }

    pub fn digest(&self, data: &[u8]) -> Digest {
        match self {
            Self::Sha1 => {
                let mut out = [0; SHA1_LEN];
                out.copy_from_slice(&Sha1::digest(data));
                out
            }
        }
    }
}

/// How the hashed bytes are to be interpreted, as signalled by the CID codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectFormat {
    /// A Git object: content, directory, revision or release.
    GitRaw,
    /// A Software Heritage snapshot.
    SwhidSnapshot,
}

impl ObjectFormat {
    pub fn from_codec(code: u64) -> Result<Self, DecodeError> {
        match code {
            GIT_RAW => Ok(Self::GitRaw),
            SWHID_1_SNP => Ok(Self::SwhidSnapshot),
            other => Err(DecodeError::UnsupportedFormat(other)),
        }
    }

    pub fn codec(&self) -> u64 {
        match self {
            Self::GitRaw => GIT_RAW,
            Self::SwhidSnapshot => SWHID_1_SNP,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GitRaw => "git-raw",
            Self::SwhidSnapshot => "swhid-1-snp",
        }
    }
}

impl Display for ObjectFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded host key: which hash, over what kind of object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedHash {
    pub algorithm: HashAlgorithm,
    pub digest: Digest,
    pub format: ObjectFormat,
}

impl TypedHash {
    pub fn new(format: ObjectFormat, digest: Digest) -> Self {
        Self {
            algorithm: HashAlgorithm::Sha1,
            digest,
            format,
        }
    }

    /// Lowercase hex digest, as used in SWHIDs.
    pub fn hex(&self) -> String {
        encode_digest_as_hex(&self.digest)
    }

    pub fn to_multihash(&self) -> Result<Multihash<64>, ipld_core::cid::multihash::Error> {
        Multihash::wrap(self.algorithm.code(), &self.digest)
    }

    /// The CIDv1 a host would use to address this hash.
    pub fn to_cid(&self) -> Result<Cid, ipld_core::cid::multihash::Error> {
        Ok(Cid::new_v1(self.format.codec(), self.to_multihash()?))
    }

    /// Hashes `data` with the same algorithm and format as `self`.
    pub fn rehash(&self, data: &[u8]) -> Self {
        Self {
            algorithm: self.algorithm,
            digest: self.algorithm.digest(data),
            format: self.format,
        }
    }

    /// Checks that `data` hashes to exactly this hash.
    pub fn verify(&self, data: &[u8]) -> Result<(), IntegrityMismatch> {
        let actual = self.rehash(data);

        if actual == *self {
            Ok(())
        } else {
            Err(IntegrityMismatch {
                expected: *self,
                actual,
            })
        }
    }
}

impl Display for TypedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/sha1:{}", self.format, self.hex())
    }
}

/// Fetched bytes do not hash to the requested key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("hash mismatch: expected {expected}, data hashes to {actual}")]
pub struct IntegrityMismatch {
    pub expected: TypedHash,
    pub actual: TypedHash,
}
