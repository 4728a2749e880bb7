//! In-memory implementation of the ScoreStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use pexeso_core::{sort_by_rank, NewScore, ScoreId, ScoreRecord};

use crate::error::{Result, StoreError};
use crate::traits::ScoreStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryScoreStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Records indexed by id.
    records: BTreeMap<ScoreId, ScoreRecord>,

    /// Highest id ever handed out, mirrors SQLite's AUTOINCREMENT sequence.
    last_id: i64,
}

impl MemoryScoreStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                records: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Storage(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Storage(format!("lock poisoned: {}", e)))
    }
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStoreInner {
    fn ranked(&self, filter: impl Fn(&ScoreRecord) -> bool) -> Vec<ScoreRecord> {
        let mut records: Vec<ScoreRecord> =
            self.records.values().filter(|&r| filter(r)).cloned().collect();
        sort_by_rank(&mut records);
        records
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn insert_score(&self, score: &NewScore) -> Result<ScoreId> {
        let mut inner = self.write()?;

        inner.last_id += 1;
        let id = ScoreId::new(inner.last_id);
        inner.records.insert(id, score.clone().with_id(id));

        Ok(id)
    }

    async fn restore_score(&self, record: &ScoreRecord) -> Result<()> {
        let mut inner = self.write()?;

        if inner.records.contains_key(&record.id) {
            return Err(StoreError::Conflict { id: record.id });
        }

        inner.last_id = inner.last_id.max(record.id.get());
        inner.records.insert(record.id, record.clone());

        Ok(())
    }

    async fn delete_score(&self, record: &ScoreRecord) -> Result<usize> {
        let mut inner = self.write()?;
        Ok(usize::from(inner.records.remove(&record.id).is_some()))
    }

    async fn delete_player(&self, name: &str) -> Result<usize> {
        let mut inner = self.write()?;

        let before = inner.records.len();
        inner.records.retain(|_, r| r.name != name);

        Ok(before - inner.records.len())
    }

    async fn delete_all(&self) -> Result<usize> {
        let mut inner = self.write()?;

        let removed = inner.records.len();
        inner.records.clear();

        Ok(removed)
    }

    async fn all_scores(&self) -> Result<Vec<ScoreRecord>> {
        let inner = self.read()?;
        Ok(inner.ranked(|_| true))
    }

    async fn scores_for_player(&self, name: &str) -> Result<Vec<ScoreRecord>> {
        let inner = self.read()?;
        Ok(inner.ranked(|r| r.name == name))
    }

    async fn get_score(&self, id: ScoreId) -> Result<Option<ScoreRecord>> {
        let inner = self.read()?;
        Ok(inner.records.get(&id).cloned())
    }

    async fn count(&self) -> Result<usize> {
        let inner = self.read()?;
        Ok(inner.records.len())
    }
}
