use std::{fmt::Display, str::FromStr};

use ipld_core::cid::Cid;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::{
    codec::{DecodeError, decode_hex_digest, encode_digest_as_hex},
    hash::{Digest, ObjectFormat, TypedHash},
};

/// Object kinds of the archive's identifier scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Content,
    Directory,
    Revision,
    Release,
    Snapshot,
}

impl ObjectKind {
    /// Kinds addressed by a Git-compatible SHA-1, in default probe order.
    pub const GIT: [ObjectKind; 4] = [
        ObjectKind::Content,
        ObjectKind::Directory,
        ObjectKind::Revision,
        ObjectKind::Release,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Content => "cnt",
            Self::Directory => "dir",
            Self::Revision => "rev",
            Self::Release => "rel",
            Self::Snapshot => "snp",
        }
    }

    pub fn format(&self) -> ObjectFormat {
        match self {
            Self::Snapshot => ObjectFormat::SwhidSnapshot,
            _ => ObjectFormat::GitRaw,
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ObjectKind {
    type Err = ParseSwhidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cnt" => Ok(Self::Content),
            "dir" => Ok(Self::Directory),
            "rev" => Ok(Self::Revision),
            "rel" => Ok(Self::Release),
            "snp" => Ok(Self::Snapshot),
            other => Err(ParseSwhidError::UnknownKind(other.to_string())),
        }
    }
}

/// A core [SWHID](https://docs.softwareheritage.org/devel/swh-model/persistent-identifiers.html),
/// `swh:1:<kind>:<hex digest>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Swhid {
    pub kind: ObjectKind,
    pub digest: Digest,
}

impl Swhid {
    pub fn new(kind: ObjectKind, digest: Digest) -> Self {
        Self { kind, digest }
    }

    pub fn typed_hash(&self) -> TypedHash {
        TypedHash::new(self.kind.format(), self.digest)
    }

    /// The CID a host addresses this object with.
    pub fn to_cid(&self) -> Result<Cid, ipld_core::cid::multihash::Error> {
        self.typed_hash().to_cid()
    }
}

impl Display for Swhid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "swh:1:{}:{}", self.kind, encode_digest_as_hex(&self.digest))
    }
}

impl FromStr for Swhid {
    type Err = ParseSwhidError;

    /// Parses a SWHID, ignoring any `;`-separated qualifiers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = s.split(';').next().unwrap_or_default();
        let mut parts = core.splitn(4, ':');

        if parts.next() != Some("swh") {
            return Err(ParseSwhidError::Scheme);
        }

        match parts.next() {
            Some("1") => {}
            other => {
                return Err(ParseSwhidError::Version(
                    other.unwrap_or_default().to_string(),
                ));
            }
        }

        let kind = parts.next().ok_or(ParseSwhidError::Truncated)?.parse()?;
        let digest = decode_hex_digest(parts.next().ok_or(ParseSwhidError::Truncated)?)?;

        Ok(Self { kind, digest })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSwhidError {
    #[error("SWHIDs start with \"swh:\"")]
    Scheme,
    #[error("unsupported SWHID version: {0:?}")]
    Version(String),
    #[error("unknown object kind: {0:?}")]
    UnknownKind(String),
    #[error("SWHID is missing its kind or digest")]
    Truncated,
    #[error(transparent)]
    Digest(#[from] DecodeError),
}

/// Identifiers to probe for one digest, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateSet(Vec<Swhid>);

impl CandidateSet {
    pub fn new(kinds: &[ObjectKind], digest: &Digest) -> Self {
        let mut candidates: Vec<Swhid> = Vec::with_capacity(kinds.len());

        for kind in kinds {
            let swhid = Swhid::new(*kind, *digest);
            if !candidates.contains(&swhid) {
                candidates.push(swhid);
            }
        }

        Self(candidates)
    }

    pub fn as_slice(&self) -> &[Swhid] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Swhid> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Swhid;
    type IntoIter = std::slice::Iter<'a, Swhid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
