use std::future::Future;

use ipld_core::cid::Cid;

use super::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Vec<u8>,
}

impl Block {
    pub fn new(cid: Cid, data: Vec<u8>) -> Self {
        Self { cid, data }
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A CID-keyed block store.
pub trait Blockstore: Send + Sync {
    fn get(&self, cid: &Cid) -> impl Future<Output = Result<Block, StoreError>> + Send;

    fn has(&self, cid: &Cid) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn get_size(&self, cid: &Cid) -> impl Future<Output = Result<usize, StoreError>> + Send;

    fn put(&self, block: Block) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn put_many(&self, blocks: Vec<Block>) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete_block(&self, cid: &Cid) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Every CID held by the store.
    fn all_keys(&self) -> impl Future<Output = Result<Vec<Cid>, StoreError>> + Send;

    /// Toggles re-hashing of blocks as they are read.
    fn hash_on_read(&self, enabled: bool);
}
