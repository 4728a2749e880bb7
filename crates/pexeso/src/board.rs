//! The score board: a score store plus live views over it.
//!
//! Every mutation that changes at least one row is followed by one delivery
//! to every live view. Mutations and subscription setup share a single async
//! gate, so a write issued before a subscription shows up in that
//! subscription's first list, and every later write arrives as a delivery.

use std::path::Path;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use pexeso_core::{NewScore, ScoreId, ScoreRecord};
use pexeso_store::{
    ScoreFeed, ScoreQuery, ScoreStore, SqliteScoreStore, Subscription, SubscriptionId,
};

use crate::error::Result;

/// Score persistence with live views.
pub struct ScoreBoard<S: ScoreStore> {
    /// The storage backend.
    store: S,
    /// Registered live views.
    feed: ScoreFeed,
    /// Serialises writes with subscription setup.
    gate: Mutex<()>,
}

impl ScoreBoard<SqliteScoreStore> {
    /// Open (or create) a SQLite score database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SqliteScoreStore::open(path)?))
    }

    /// A board over a private in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::new(SqliteScoreStore::open_memory()?))
    }
}

impl<S: ScoreStore> ScoreBoard<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            feed: ScoreFeed::new(),
            gate: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a result under a fresh id.
    pub async fn add(&self, score: &NewScore) -> Result<ScoreId> {
        let _gate = self.gate.lock().await;

        let id = self.store.insert_score(score).await?;
        debug!(%id, name = %score.name, score = score.score, time = score.time, "score added");

        self.notify().await;
        Ok(id)
    }

    /// Record several results. Each insert stands on its own.
    ///
    /// Stops at the first failure; the inserts before it stay recorded and
    /// live views see them. A batch is delivered to views as one change.
    pub async fn add_batch(&self, scores: &[NewScore]) -> Result<Vec<ScoreId>> {
        let _gate = self.gate.lock().await;

        let mut ids = Vec::with_capacity(scores.len());
        let mut failure = None;
        for score in scores {
            match self.store.insert_score(score).await {
                Ok(id) => ids.push(id),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if !ids.is_empty() {
            debug!(added = ids.len(), "score batch added");
            self.notify().await;
        }

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(ids),
        }
    }

    /// Put back a record under its original id.
    ///
    /// Fails with a conflict if the id is already taken.
    pub async fn restore(&self, record: &ScoreRecord) -> Result<()> {
        let _gate = self.gate.lock().await;

        self.store.restore_score(record).await?;
        debug!(id = %record.id, "score restored");

        self.notify().await;
        Ok(())
    }

    /// Remove one record. Returns the number of rows removed (0 or 1).
    pub async fn remove(&self, record: &ScoreRecord) -> Result<usize> {
        let _gate = self.gate.lock().await;

        let removed = self.store.delete_score(record).await?;
        if removed > 0 {
            self.notify().await;
        }
        Ok(removed)
    }

    /// Remove every record of a player. Removing an unknown player is a no-op.
    pub async fn remove_player(&self, name: &str) -> Result<usize> {
        let _gate = self.gate.lock().await;

        let removed = self.store.delete_player(name).await?;
        debug!(name, removed, "player scores removed");
        if removed > 0 {
            self.notify().await;
        }
        Ok(removed)
    }

    /// Remove every record.
    pub async fn clear_all(&self) -> Result<usize> {
        let _gate = self.gate.lock().await;

        let removed = self.store.delete_all().await?;
        debug!(removed, "score board cleared");
        if removed > 0 {
            self.notify().await;
        }
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Live views
    // ─────────────────────────────────────────────────────────────────────────

    /// Follow every record, ordered by score then time.
    pub async fn all_scores(&self) -> Result<Subscription> {
        self.subscribe(ScoreQuery::All).await
    }

    /// Follow one player's records, ordered by score then time.
    pub async fn scores_for_player(&self, name: &str) -> Result<Subscription> {
        self.subscribe(ScoreQuery::Player(name.to_string())).await
    }

    /// Follow the records matched by `query`.
    pub async fn subscribe(&self, query: ScoreQuery) -> Result<Subscription> {
        let _gate = self.gate.lock().await;

        let initial = query.run(&self.store).await?;
        Ok(self.feed.register(query, initial)?)
    }

    /// Stop a live view. Returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool> {
        Ok(self.feed.unsubscribe(id)?)
    }

    /// Number of registered live views.
    pub fn live_views(&self) -> Result<usize> {
        Ok(self.feed.len()?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // One-shot reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Every record right now, ordered by score then time.
    pub async fn snapshot_all(&self) -> Result<Vec<ScoreRecord>> {
        Ok(self.store.all_scores().await?)
    }

    /// One player's records right now, ordered by score then time.
    pub async fn snapshot_player(&self, name: &str) -> Result<Vec<ScoreRecord>> {
        Ok(self.store.scores_for_player(name).await?)
    }

    /// Deliver fresh lists to every live view.
    ///
    /// The write has already committed, so a failed re-query is logged
    /// rather than reported to the writer.
    async fn notify(&self) {
        if let Err(e) = self.feed.publish(&self.store).await {
            warn!(error = %e, "failed to refresh live score views");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pexeso_core::PlayerName;
    use pexeso_store::MemoryScoreStore;

    fn new_score(name: &str, score: u32, time: u64) -> NewScore {
        NewScore::at(&PlayerName::parse(name).unwrap(), score, time, 1_700_000_000_000)
    }

    fn keys(list: &[ScoreRecord]) -> Vec<(u32, u64)> {
        list.iter().map(|r| (r.score, r.time)).collect()
    }

    #[tokio::test]
    async fn test_all_scores_sorted_live() {
        let board = ScoreBoard::new(MemoryScoreStore::new());
        board.add(&new_score("a", 3, 50)).await.unwrap();

        let mut view = board.all_scores().await.unwrap();
        assert_eq!(keys(&view.recv().await.unwrap()), vec![(3, 50)]);

        board.add(&new_score("b", 3, 40)).await.unwrap();
        assert_eq!(keys(&view.recv().await.unwrap()), vec![(3, 40), (3, 50)]);

        board.add(&new_score("c", 5, 10)).await.unwrap();
        assert_eq!(
            keys(&view.recv().await.unwrap()),
            vec![(3, 40), (3, 50), (5, 10)]
        );
    }

    #[tokio::test]
    async fn test_player_view_follows_removal() {
        let board = ScoreBoard::new(MemoryScoreStore::new());
        board.add(&new_score("Alice", 10, 10)).await.unwrap();
        board.add(&new_score("Bob", 11, 10)).await.unwrap();

        let mut alice = board.scores_for_player("Alice").await.unwrap();
        assert_eq!(alice.recv().await.unwrap().len(), 1);

        assert_eq!(board.remove_player("Alice").await.unwrap(), 1);
        assert!(alice.recv().await.unwrap().is_empty());

        // Nothing changed, so nothing is delivered.
        assert_eq!(board.remove_player("Alice").await.unwrap(), 0);
        assert!(alice.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_one_delivery_per_mutation() {
        let board = ScoreBoard::new(MemoryScoreStore::new());
        let mut view = board.all_scores().await.unwrap();
        view.try_recv();

        let id = board.add(&new_score("a", 1, 1)).await.unwrap();
        board
            .add_batch(&[new_score("b", 2, 2), new_score("c", 3, 3)])
            .await
            .unwrap();
        let record = board.store().get_score(id).await.unwrap().unwrap();
        board.remove(&record).await.unwrap();
        board.clear_all().await.unwrap();

        let deliveries: Vec<usize> = std::iter::from_fn(|| view.try_recv())
            .map(|list| list.len())
            .collect();
        assert_eq!(deliveries, vec![1, 3, 2, 0]);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_deliveries() {
        let board = ScoreBoard::new(MemoryScoreStore::new());
        let mut view = board.all_scores().await.unwrap();
        assert_eq!(board.live_views().unwrap(), 1);

        assert!(board.unsubscribe(view.id()).unwrap());
        board.add(&new_score("a", 1, 1)).await.unwrap();

        assert_eq!(view.recv().await, Some(Vec::new()));
        assert_eq!(view.recv().await, None);
        assert_eq!(board.live_views().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_restore_conflict_surfaces() {
        let board = ScoreBoard::open_memory().unwrap();
        let id = board.add(&new_score("a", 1, 1)).await.unwrap();
        let record = board.snapshot_all().await.unwrap().remove(0);
        assert_eq!(record.id, id);

        let err = board.restore(&record).await.unwrap_err();
        assert!(matches!(
            err,
            crate::PexesoError::Store(pexeso_store::StoreError::Conflict { .. })
        ));
    }
}
