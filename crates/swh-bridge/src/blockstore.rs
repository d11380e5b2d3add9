use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use swh_bridge_core::{
    Cid,
    store::{Block, Blockstore, StoreError},
};
use tracing::debug;

use crate::resolver::Resolver;

/// Read-through blockstore over the archive.
///
/// Blocks are re-hashed on read unless disabled with [`Blockstore::hash_on_read`].
/// Clones share that setting.
#[derive(Clone, Debug)]
pub struct BridgeBlockstore {
    resolver: Resolver,
    rehash: Arc<AtomicBool>,
}

impl BridgeBlockstore {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            rehash: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn rehash_enabled(&self) -> bool {
        self.rehash.load(Ordering::Relaxed)
    }
}

impl Blockstore for BridgeBlockstore {
    async fn get(&self, cid: &Cid) -> Result<Block, StoreError> {
        let block = self
            .resolver
            .resolve_cid(cid, self.rehash_enabled())
            .await
            .into_result()?;

        Ok(Block::new(*cid, block.data))
    }

    async fn has(&self, cid: &Cid) -> Result<bool, StoreError> {
        Ok(self.resolver.exists_cid(cid).await?)
    }

    // TODO: use a metadata endpoint once the archive exposes sizes for every object kind.
    async fn get_size(&self, cid: &Cid) -> Result<usize, StoreError> {
        self.get(cid).await.map(|block| block.data().len())
    }

    async fn put(&self, block: Block) -> Result<(), StoreError> {
        self.resolver
            .span()
            .in_scope(|| debug!("discarding block {}", block.cid()));
        Ok(())
    }

    async fn put_many(&self, blocks: Vec<Block>) -> Result<(), StoreError> {
        self.resolver
            .span()
            .in_scope(|| debug!("discarding {} blocks", blocks.len()));
        Ok(())
    }

    async fn delete_block(&self, _: &Cid) -> Result<(), StoreError> {
        Ok(())
    }

    /// The archive cannot be enumerated.
    async fn all_keys(&self) -> Result<Vec<Cid>, StoreError> {
        Ok(Vec::new())
    }

    fn hash_on_read(&self, enabled: bool) {
        self.rehash.store(enabled, Ordering::Relaxed);
    }
}
