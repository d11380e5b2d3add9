use swh_bridge_core::{
    Key,
    store::{Batching, Datastore, Entry, Query, StoreError},
};
use tracing::debug;

use crate::resolver::Resolver;

/// Read-through datastore over the archive.
///
/// Writes are accepted and dropped, or rejected in strict mode.
#[derive(Clone, Debug)]
pub struct BridgeDatastore {
    resolver: Resolver,
    strict_writes: bool,
}

impl BridgeDatastore {
    pub fn new(resolver: Resolver, strict_writes: bool) -> Self {
        Self {
            resolver,
            strict_writes,
        }
    }

    fn ignore(&self, op: &'static str, key: &Key) -> Result<(), StoreError> {
        if self.strict_writes {
            return Err(StoreError::Unsupported(op));
        }

        self.resolver
            .span()
            .in_scope(|| debug!("ignoring {} {}", op, key));

        Ok(())
    }
}

impl Datastore for BridgeDatastore {
    async fn get(&self, key: &Key) -> Result<Vec<u8>, StoreError> {
        let block = self.resolver.resolve_key(key).await.into_result()?;
        Ok(block.data)
    }

    async fn has(&self, key: &Key) -> Result<bool, StoreError> {
        Ok(self.resolver.exists_key(key).await?)
    }

    /// The archive has no size endpoint, so this downloads the object.
    async fn get_size(&self, key: &Key) -> Result<usize, StoreError> {
        self.get(key).await.map(|data| data.len())
    }

    async fn put(&self, key: &Key, _: Vec<u8>) -> Result<(), StoreError> {
        self.ignore("put", key)
    }

    async fn delete(&self, key: &Key) -> Result<(), StoreError> {
        self.ignore("delete", key)
    }

    async fn sync(&self, prefix: &Key) -> Result<(), StoreError> {
        self.ignore("sync", prefix)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Entry>, StoreError> {
        if self.strict_writes {
            return Err(StoreError::Unsupported("query"));
        }

        self.resolver
            .span()
            .in_scope(|| debug!("query {:?}", query));

        Ok(Vec::new())
    }
}

impl Batching for BridgeDatastore {}
