//! Storage interfaces a host expects its backends to implement.

use thiserror::Error;

use crate::{codec::DecodeError, hash::IntegrityMismatch};

mod batch;
mod blockstore;
mod datastore;

pub use batch::*;
pub use blockstore::*;
pub use datastore::*;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The host's canonical absence signal.
    #[error("not found")]
    NotFound,
    #[error("{0} is not supported")]
    Unsupported(&'static str),
    #[error("invalid key: {0}")]
    InvalidKey(#[from] DecodeError),
    #[error(transparent)]
    HashMismatch(#[from] IntegrityMismatch),
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
