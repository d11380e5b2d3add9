//! Resolution of host keys to archive objects.
//!
//! A Git SHA-1 does not say whether it names a content, directory, revision or
//! release, so every plausible SWHID is probed in one request and the first
//! known one is fetched. Snapshots have their own codec and are fetched directly.

use std::{fmt::Display, sync::Arc};

use swh_bridge_core::{
    CandidateSet, Cid, DecodeError, IntegrityMismatch, Key, ObjectFormat, ObjectKind, Swhid,
    TypedHash,
    codec::{decode_block_key, decode_datastore_key},
    store::StoreError,
};
use tracing::{Instrument, Span, debug, warn};

use crate::client::{ArchiveClient, ClientError};

/// Bytes fetched from the archive, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBlock {
    pub swhid: Swhid,
    pub data: Vec<u8>,
}

#[derive(Debug)]
pub enum ResolutionOutcome {
    Found(FetchedBlock),
    /// The archive holds nothing for this key, or the key is not one it could hold.
    NotFound,
    Malformed(DecodeError),
    TransientError(ClientError),
    IntegrityMismatch(IntegrityMismatch),
}

impl ResolutionOutcome {
    pub fn into_result(self) -> Result<FetchedBlock, StoreError> {
        match self {
            Self::Found(block) => Ok(block),
            Self::NotFound => Err(StoreError::NotFound),
            Self::Malformed(err) => Err(StoreError::InvalidKey(err)),
            Self::TransientError(err) => Err(err.into()),
            Self::IntegrityMismatch(err) => Err(StoreError::HashMismatch(err)),
        }
    }
}

impl From<ClientError> for StoreError {
    fn from(value: ClientError) -> Self {
        StoreError::Backend(Box::new(value))
    }
}

#[derive(Clone, Debug)]
pub struct Resolver {
    client: ArchiveClient,
    kind_priority: Arc<[ObjectKind]>,
    span: Span,
}

impl Resolver {
    /// Creates a resolver. Everything it logs is recorded within `span`.
    pub fn new(client: ArchiveClient, kind_priority: Vec<ObjectKind>, span: Span) -> Self {
        Self {
            client,
            kind_priority: kind_priority.into(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn candidates(&self, hash: &TypedHash) -> CandidateSet {
        match hash.format {
            ObjectFormat::GitRaw => CandidateSet::new(&self.kind_priority, &hash.digest),
            ObjectFormat::SwhidSnapshot => {
                CandidateSet::new(&[ObjectKind::Snapshot], &hash.digest)
            }
        }
    }

    pub async fn resolve(&self, hash: &TypedHash) -> ResolutionOutcome {
        self.resolve_inner(hash)
            .instrument(self.span.clone())
            .await
    }

    /// Resolves `hash`, then checks the fetched bytes hash back to it.
    pub async fn resolve_verified(&self, hash: &TypedHash) -> ResolutionOutcome {
        match self.resolve(hash).await {
            ResolutionOutcome::Found(block) => match hash.verify(&block.data) {
                Ok(()) => ResolutionOutcome::Found(block),
                Err(err) => {
                    self.span
                        .in_scope(|| warn!("archive served corrupt data for {}: {}", block.swhid, err));
                    ResolutionOutcome::IntegrityMismatch(err)
                }
            },
            other => other,
        }
    }

    pub async fn resolve_key(&self, key: &Key) -> ResolutionOutcome {
        match decode_datastore_key(key) {
            Ok(hash) => self.resolve(&hash).await,
            Err(err) => self.rejected(key, err),
        }
    }

    pub async fn resolve_cid(&self, cid: &Cid, verify: bool) -> ResolutionOutcome {
        match decode_block_key(cid) {
            Ok(hash) if verify => self.resolve_verified(&hash).await,
            Ok(hash) => self.resolve(&hash).await,
            Err(err) => self.rejected(cid, err),
        }
    }

    async fn resolve_inner(&self, hash: &TypedHash) -> ResolutionOutcome {
        let swhid = match hash.format {
            ObjectFormat::SwhidSnapshot => Swhid::new(ObjectKind::Snapshot, hash.digest),
            ObjectFormat::GitRaw => match self.client.probe_existence(&self.candidates(hash)).await
            {
                Ok(Some(swhid)) => swhid,
                Ok(None) => {
                    debug!("no SWHID found for {}", hash.hex());
                    return ResolutionOutcome::NotFound;
                }
                Err(err) => {
                    warn!("failed to look up {}: {}", hash.hex(), err);
                    return ResolutionOutcome::TransientError(err);
                }
            },
        };

        match self.client.fetch_content(&swhid).await {
            Ok(data) => ResolutionOutcome::Found(FetchedBlock { swhid, data }),
            // The object may have been known a moment ago and gone now.
            Err(ClientError::NotFound(_)) => {
                debug!("{} not found", swhid);
                ResolutionOutcome::NotFound
            }
            Err(err) => {
                warn!("failed to fetch {}: {}", swhid, err);
                ResolutionOutcome::TransientError(err)
            }
        }
    }

    fn rejected(&self, key: &dyn Display, err: DecodeError) -> ResolutionOutcome {
        self.span.in_scope(|| {
            if err.is_foreign() {
                debug!("bridge can't get {}: {}", key, err);
                ResolutionOutcome::NotFound
            } else {
                debug!("malformed key {}: {}", key, err);
                ResolutionOutcome::Malformed(err)
            }
        })
    }

    /// Whether the archive knows `hash`. Never fetches content.
    pub async fn exists(&self, hash: &TypedHash) -> Result<bool, ClientError> {
        async {
            let found = self.client.probe_existence(&self.candidates(hash)).await?;
            Ok(found.is_some())
        }
        .instrument(self.span.clone())
        .await
    }

    /// Like [`Resolver::exists`], but any key that does not decode is simply absent.
    pub async fn exists_key(&self, key: &Key) -> Result<bool, ClientError> {
        match decode_datastore_key(key) {
            Ok(hash) => self.exists(&hash).await,
            Err(err) => {
                self.span
                    .in_scope(|| debug!("bridge doesn't have {}: {}", key, err));
                Ok(false)
            }
        }
    }

    pub async fn exists_cid(&self, cid: &Cid) -> Result<bool, ClientError> {
        match decode_block_key(cid) {
            Ok(hash) => self.exists(&hash).await,
            Err(err) => {
                self.span
                    .in_scope(|| debug!("bridge doesn't have {}: {}", cid, err));
                Ok(false)
            }
        }
    }
}
