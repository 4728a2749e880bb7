//! Store trait: the abstract interface for score persistence.
//!
//! This trait keeps the game storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use pexeso_core::{NewScore, ScoreId, ScoreRecord};

use crate::error::Result;

/// The ScoreStore trait: async interface for score persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Store-assigned ids**: `insert_score` never conflicts. Ids are monotonic
///   and never reused, even after deletion.
/// - **Forced ids**: `restore_score` keeps the caller's id and returns
///   `StoreError::Conflict` if it is taken.
/// - **Idempotent deletes**: deleting something absent succeeds and reports 0.
/// - **Listing order**: `(score, time, id)` ascending for every list query.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Inserts
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a result and return its fresh id.
    async fn insert_score(&self, score: &NewScore) -> Result<ScoreId>;

    /// Insert several results, each independently.
    ///
    /// Stops at the first failure; earlier inserts stay committed.
    async fn insert_scores(&self, scores: &[NewScore]) -> Result<Vec<ScoreId>> {
        let mut ids = Vec::with_capacity(scores.len());
        for score in scores {
            ids.push(self.insert_score(score).await?);
        }
        Ok(ids)
    }

    /// Insert a record under its existing id.
    async fn restore_score(&self, record: &ScoreRecord) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Deletes
    // ─────────────────────────────────────────────────────────────────────────

    /// Delete one record by id. Returns the number of rows removed (0 or 1).
    async fn delete_score(&self, record: &ScoreRecord) -> Result<usize>;

    /// Delete every record of a player.
    async fn delete_player(&self, name: &str) -> Result<usize>;

    /// Delete every record.
    async fn delete_all(&self) -> Result<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// All records in listing order.
    async fn all_scores(&self) -> Result<Vec<ScoreRecord>>;

    /// Records whose name equals `name`, in listing order.
    async fn scores_for_player(&self, name: &str) -> Result<Vec<ScoreRecord>>;

    /// Get a record by id.
    async fn get_score(&self, id: ScoreId) -> Result<Option<ScoreRecord>>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize>;
}
