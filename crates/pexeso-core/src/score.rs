//! Score records: the result of one completed game.

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::types::{PlayerName, ScoreId};

/// A persisted game result.
///
/// Immutable once created. `time` is elapsed whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Store-assigned identifier.
    pub id: ScoreId,
    /// Creation timestamp (Unix ms).
    pub date: i64,
    /// Player display name.
    pub name: String,
    /// Number of moves taken.
    pub score: u32,
    /// Elapsed seconds.
    pub time: u64,
}

impl ScoreRecord {
    /// The sort key for score listings: fewer moves first, then faster.
    ///
    /// The id breaks ties so the order is total.
    pub fn rank_key(&self) -> (u32, u64, ScoreId) {
        (self.score, self.time, self.id)
    }

    /// Compare two records by [`rank_key`](Self::rank_key).
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        self.rank_key().cmp(&other.rank_key())
    }

    /// Drop the id, leaving the caller-supplied fields.
    pub fn to_new(&self) -> NewScore {
        NewScore {
            date: self.date,
            name: self.name.clone(),
            score: self.score,
            time: self.time,
        }
    }
}

/// A score record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewScore {
    /// Creation timestamp (Unix ms).
    pub date: i64,
    /// Player display name.
    pub name: String,
    /// Number of moves taken.
    pub score: u32,
    /// Elapsed seconds.
    pub time: u64,
}

impl NewScore {
    /// A result stamped with the current time.
    pub fn new(player: &PlayerName, score: u32, time: u64) -> Self {
        Self::at(player, score, time, now_millis())
    }

    /// A result with an explicit creation timestamp.
    pub fn at(player: &PlayerName, score: u32, time: u64, date: i64) -> Self {
        Self {
            date,
            name: player.as_str().to_string(),
            score,
            time,
        }
    }

    /// Attach a store-assigned id.
    pub fn with_id(self, id: ScoreId) -> ScoreRecord {
        ScoreRecord {
            id,
            date: self.date,
            name: self.name,
            score: self.score,
            time: self.time,
        }
    }
}

/// Sort records into listing order, see [`ScoreRecord::rank_key`].
pub fn sort_by_rank(records: &mut [ScoreRecord]) {
    records.sort_by(ScoreRecord::cmp_rank);
}

/// Get current time in milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, score: u32, time: u64) -> ScoreRecord {
        ScoreRecord {
            id: ScoreId::new(id),
            date: 1_700_000_000_000,
            name: "Alice".to_string(),
            score,
            time,
        }
    }

    #[test]
    fn test_sort_by_score_then_time() {
        let mut records = vec![record(1, 3, 50), record(2, 3, 40), record(3, 5, 10)];
        sort_by_rank(&mut records);

        let keys: Vec<(u32, u64)> = records.iter().map(|r| (r.score, r.time)).collect();
        assert_eq!(keys, vec![(3, 40), (3, 50), (5, 10)]);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let mut records = vec![record(9, 4, 30), record(2, 4, 30)];
        sort_by_rank(&mut records);
        assert_eq!(records[0].id, ScoreId::new(2));
    }

    #[test]
    fn test_new_score_with_id() {
        let player = PlayerName::parse("Alice").unwrap();
        let new = NewScore::at(&player, 12, 65, 1234);
        let stored = new.clone().with_id(ScoreId::new(4));

        assert_eq!(stored.id, ScoreId::new(4));
        assert_eq!(stored.name, "Alice");
        assert_eq!(stored.to_new(), new);
    }

    #[test]
    fn test_new_score_stamps_now() {
        let player = PlayerName::parse("Bob").unwrap();
        let before = now_millis();
        let new = NewScore::new(&player, 10, 30);
        assert!(new.date >= before);
    }
}
