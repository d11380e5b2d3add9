use crate::key::Key;

use super::{Datastore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum BatchOp {
    Put(Key, Vec<u8>),
    Delete(Key),
}

/// Buffers writes and replays them against the store on [`Batch::commit`].
pub struct Batch<'a, D: Datastore> {
    store: &'a D,
    ops: Vec<BatchOp>,
}

impl<'a, D: Datastore> Batch<'a, D> {
    pub fn new(store: &'a D) -> Self {
        Self {
            store,
            ops: Vec::new(),
        }
    }

    pub fn put(&mut self, key: Key, value: Vec<u8>) {
        self.ops.push(BatchOp::Put(key, value));
    }

    pub fn delete(&mut self, key: Key) {
        self.ops.push(BatchOp::Delete(key));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies buffered operations in order, stopping at the first failure.
    pub async fn commit(self) -> Result<(), StoreError> {
        for op in self.ops {
            match op {
                BatchOp::Put(key, value) => self.store.put(&key, value).await?,
                BatchOp::Delete(key) => self.store.delete(&key).await?,
            }
        }

        Ok(())
    }
}
