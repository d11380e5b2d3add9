//! Translation between host keys and archive digests.
//!
//! Hosts address data either with datastore keys (`/` followed by the unpadded
//! base-32 encoding of a multihash) or with CIDs. Both are reduced to a
//! [`TypedHash`], whose digest is then rendered as lowercase hex for SWHIDs.

use ipld_core::cid::{Cid, multihash::Multihash};
use multibase::Base;
use thiserror::Error;

use crate::{
    hash::{Digest, HashAlgorithm, ObjectFormat, SHA1_LEN, TypedHash},
    key::Key,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a multihash: {0}")]
    NotAHash(String),
    #[error("multihash code {0:#x} is not SHA-1 (0x11)")]
    WrongAlgorithm(u64),
    #[error("codec {0:#x} is neither git-raw (0x78) nor swhid-1-snp (0x1f0)")]
    UnsupportedFormat(u64),
}

impl DecodeError {
    /// Whether the key is well-formed but addresses something the archive cannot hold.
    ///
    /// Hosts probe every backend with every key, so foreign keys are absences, not errors.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::WrongAlgorithm(_) | Self::UnsupportedFormat(_))
    }
}

/// Decodes a flat datastore key.
///
/// Datastore keys carry no codec, so the result is always [`ObjectFormat::GitRaw`].
pub fn decode_datastore_key(key: &Key) -> Result<TypedHash, DecodeError> {
    let data = Base::Base32Upper
        .decode(key.name())
        .map_err(|e| DecodeError::NotAHash(format!("invalid base32 key {}: {}", key, e)))?;

    let multihash =
        Multihash::<64>::from_bytes(&data).map_err(|e| DecodeError::NotAHash(e.to_string()))?;

    decode_multihash(&multihash, ObjectFormat::GitRaw)
}

/// Decodes a block key.
pub fn decode_block_key(cid: &Cid) -> Result<TypedHash, DecodeError> {
    let format = ObjectFormat::from_codec(cid.codec())?;
    decode_multihash(cid.hash(), format)
}

fn decode_multihash(
    multihash: &Multihash<64>,
    format: ObjectFormat,
) -> Result<TypedHash, DecodeError> {
    let algorithm = HashAlgorithm::from_code(multihash.code())?;

    let digest: Digest = multihash.digest().try_into().map_err(|_| {
        DecodeError::NotAHash(format!(
            "expected a {} byte digest, got {}",
            algorithm.digest_len(),
            multihash.size()
        ))
    })?;

    Ok(TypedHash {
        algorithm,
        digest,
        format,
    })
}

/// Encodes a digest as lowercase hex, without a multibase prefix.
pub fn encode_digest_as_hex(digest: &[u8]) -> String {
    let mut encoded = multibase::encode(Base::Base16Lower, digest);
    // Drop the 'f' multibase prefix.
    encoded.split_off(1)
}

/// Parses a hex SHA-1 digest. Accepts either case.
pub fn decode_hex_digest(hex: &str) -> Result<Digest, DecodeError> {
    let bytes = Base::Base16Lower
        .decode(hex.to_ascii_lowercase())
        .map_err(|e| DecodeError::NotAHash(format!("invalid hex digest {}: {}", hex, e)))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        DecodeError::NotAHash(format!(
            "expected a {} byte digest, got {}",
            SHA1_LEN,
            bytes.len()
        ))
    })
}
