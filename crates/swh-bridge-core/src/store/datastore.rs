use std::future::Future;

use crate::key::Key;

use super::{Batch, StoreError};

/// A flat, byte-keyed store.
pub trait Datastore: Send + Sync {
    fn get(&self, key: &Key) -> impl Future<Output = Result<Vec<u8>, StoreError>> + Send;

    fn has(&self, key: &Key) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn get_size(&self, key: &Key) -> impl Future<Output = Result<usize, StoreError>> + Send;

    fn put(&self, key: &Key, value: Vec<u8>)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, key: &Key) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Flushes pending writes under `prefix` to durable storage.
    fn sync(&self, prefix: &Key) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn query(&self, query: &Query) -> impl Future<Output = Result<Vec<Entry>, StoreError>> + Send;
}

/// A datastore that can group writes.
pub trait Batching: Datastore + Sized {
    fn batch(&self) -> Batch<'_, Self> {
        Batch::new(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub prefix: Option<Key>,
    pub keys_only: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Key,
    pub value: Option<Vec<u8>>,
    pub size: usize,
}
