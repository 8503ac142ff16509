//! Per-knowledge-base advisory locks
//!
//! Uploads hold the shared side while they check the knowledge base, write the
//! file and insert the record. Hard delete holds the exclusive side while it
//! removes the directory and the row, so neither can interleave with the other.
//!
//! An entry lives only while some task holds or waits on it, so lookups of
//! unknown ids do not accumulate.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use crate::domain::KnowledgeBaseId;

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseLocks {
    locks: Arc<Mutex<HashMap<KnowledgeBaseId, Arc<RwLock<()>>>>>,
}

impl KnowledgeBaseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, kb_id: &KnowledgeBaseId) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().await;

        // The map's own handle is the only one left on idle entries
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);

        locks.entry(*kb_id).or_default().clone()
    }

    /// Shared access, for uploads
    pub async fn read(&self, kb_id: &KnowledgeBaseId) -> OwnedRwLockReadGuard<()> {
        self.lock_for(kb_id).await.read_owned().await
    }

    /// Exclusive access, for hard delete
    pub async fn write(&self, kb_id: &KnowledgeBaseId) -> OwnedRwLockWriteGuard<()> {
        self.lock_for(kb_id).await.write_owned().await
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
