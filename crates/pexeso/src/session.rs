//! A single player's game: name, clock, mismatch hide timer, and result.
//!
//! The session wraps a [`MatchEngine`] with the behavior the engine leaves to
//! its caller:
//!
//! - a mismatched pair stays face-up for the configured hide delay, and every
//!   click during that time is ignored;
//! - the clock stops on completion and the result is packaged as a
//!   [`NewScore`] with the elapsed whole seconds.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use pexeso_core::{now_millis, CoreError, GameEvent, MatchEngine, NewScore, PlayerName, ScoreId};
use pexeso_store::ScoreStore;

use crate::board::ScoreBoard;
use crate::config::GameConfig;
use crate::error::Result;

/// A mismatched pair waiting to be turned face-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingHide {
    positions: (usize, usize),
    due: Instant,
}

/// One game played by one player.
#[derive(Debug)]
pub struct GameSession {
    player: PlayerName,
    engine: MatchEngine,
    hide_delay: Duration,
    pending_hide: Option<PendingHide>,
    started: Instant,
    finished: Option<Instant>,
    /// Wall-clock completion time (Unix ms), the date of the result.
    completed_at: Option<i64>,
    /// Id of the stored result, once recorded.
    recorded: Option<ScoreId>,
}

impl GameSession {
    /// Validate the player name and config, then deal a game.
    ///
    /// A blank name is rejected before any engine is built.
    pub fn start(name: &str, config: &GameConfig) -> Result<Self> {
        let player = PlayerName::parse(name)?;
        config.validate()?;

        let engine = match config.seed {
            Some(seed) => MatchEngine::seeded(&config.faces, seed)?,
            None => MatchEngine::new(&config.faces)?,
        };

        info!(player = %player, cards = config.deck_size(), "game session started");

        Ok(Self {
            player,
            engine,
            hide_delay: config.hide_delay(),
            pending_hide: None,
            started: Instant::now(),
            finished: None,
            completed_at: None,
            recorded: None,
        })
    }

    /// Report a click on a card.
    ///
    /// While a mismatched pair is waiting to be hidden every click is
    /// `Ignored`. Out-of-range positions fail either way.
    pub fn click(&mut self, position: usize) -> Result<Vec<GameEvent>> {
        if self.pending_hide.is_some() {
            let len = self.engine.card_count();
            if position >= len {
                return Err(CoreError::PositionOutOfRange { position, len }.into());
            }
            debug!(position, "input locked, click ignored");
            return Ok(vec![GameEvent::Ignored(position)]);
        }

        let events = self.engine.select(position)?;

        for event in &events {
            match *event {
                GameEvent::Mismatch(a, b) => {
                    self.pending_hide = Some(PendingHide {
                        positions: (a, b),
                        due: Instant::now() + self.hide_delay,
                    });
                }
                GameEvent::GameComplete => {
                    self.finished = Some(Instant::now());
                    self.completed_at = Some(now_millis());
                    info!(
                        player = %self.player,
                        moves = self.engine.moves(),
                        seconds = self.elapsed().as_secs(),
                        "game finished"
                    );
                }
                _ => {}
            }
        }

        Ok(events)
    }

    /// Turn the waiting mismatched pair face-down and unlock input.
    ///
    /// This is the hide timer firing. Returns the pair, or `None` if nothing
    /// was waiting.
    pub fn hide_pending(&mut self) -> Result<Option<(usize, usize)>> {
        let Some(pending) = self.pending_hide.take() else {
            return Ok(None);
        };

        let (a, b) = pending.positions;
        self.engine.turn_face_down(&[a, b])?;
        debug!(a, b, "mismatched pair hidden");

        Ok(Some((a, b)))
    }

    /// Fire the hide only if its deadline has passed by `now`.
    pub fn hide_if_due(&mut self, now: Instant) -> Result<Option<(usize, usize)>> {
        match self.pending_hide {
            Some(pending) if pending.due <= now => self.hide_pending(),
            _ => Ok(None),
        }
    }

    /// Sleep until the pending hide is due, then fire it.
    pub async fn wait_and_hide(&mut self) -> Result<Option<(usize, usize)>> {
        if let Some(due) = self.hide_deadline() {
            tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await;
        }
        self.hide_pending()
    }

    /// When the waiting mismatched pair is due to be hidden.
    pub fn hide_deadline(&self) -> Option<Instant> {
        self.pending_hide.map(|p| p.due)
    }

    /// Whether clicks are currently ignored.
    pub fn is_input_locked(&self) -> bool {
        self.pending_hide.is_some()
    }

    /// Deal a fresh deck for the same player and restart the clock.
    pub fn restart(&mut self) -> Result<()> {
        self.engine.restart()?;
        self.pending_hide = None;
        self.started = Instant::now();
        self.finished = None;
        self.completed_at = None;
        self.recorded = None;
        debug!(player = %self.player, "game session restarted");
        Ok(())
    }

    /// The player.
    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    /// The underlying engine, for rendering.
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Moves so far.
    pub fn moves(&self) -> u32 {
        self.engine.moves()
    }

    /// Whether every pair has been found.
    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    /// Time played. Stops growing once the game is complete.
    pub fn elapsed(&self) -> Duration {
        self.finished
            .unwrap_or_else(Instant::now)
            .saturating_duration_since(self.started)
    }

    /// The result to persist, once the game is complete.
    pub fn result(&self) -> Option<NewScore> {
        let date = self.completed_at?;
        Some(NewScore::at(
            &self.player,
            self.engine.moves(),
            self.elapsed().as_secs(),
            date,
        ))
    }

    /// Persist the result. Returns `None` if the game is not complete.
    ///
    /// A game is stored once. Later calls return the id of the stored row
    /// without writing again; a failed write may be retried.
    pub async fn record<S: ScoreStore>(
        &mut self,
        board: &ScoreBoard<S>,
    ) -> Result<Option<ScoreId>> {
        if let Some(id) = self.recorded {
            debug!(%id, "result already recorded");
            return Ok(Some(id));
        }

        let Some(score) = self.result() else {
            return Ok(None);
        };
        let id = board.add(&score).await?;
        self.recorded = Some(id);
        Ok(Some(id))
    }

    /// Id of the stored result, if this game has been recorded.
    pub fn recorded(&self) -> Option<ScoreId> {
        self.recorded
    }

    /// Persist the result, logging and swallowing any failure.
    ///
    /// The game still counts as finished when this returns `None`.
    pub async fn record_best_effort<S: ScoreStore>(
        &mut self,
        board: &ScoreBoard<S>,
    ) -> Option<ScoreId> {
        match self.record(board).await {
            Ok(id) => {
                if let Some(id) = id {
                    debug!(%id, "score added successfully");
                }
                id
            }
            Err(e) => {
                warn!(error = %e, player = %self.player, "error adding score to database");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PexesoError;
    use async_trait::async_trait;
    use pexeso_core::{FaceId, ScoreRecord};
    use pexeso_store::{MemoryScoreStore, StoreError};

    fn config(hide_delay_ms: u64) -> GameConfig {
        GameConfig {
            faces: ["sun", "moon", "star"].into_iter().map(FaceId::from).collect(),
            rows: 2,
            columns: 3,
            hide_delay_ms,
            seed: Some(7),
            ..GameConfig::default()
        }
    }

    fn pairs(session: &GameSession) -> Vec<(usize, usize)> {
        let deck = session.engine().cards_in_play();
        let mut out = Vec::new();
        for (i, card) in deck.iter().enumerate() {
            if let Some(j) = (i + 1..deck.len()).find(|&j| deck[j].face == card.face) {
                out.push((i, j));
            }
        }
        out
    }

    fn mismatched(session: &GameSession) -> (usize, usize) {
        let deck = session.engine().cards_in_play();
        let b = (1..deck.len())
            .find(|&j| deck[j].face != deck[0].face)
            .unwrap();
        (0, b)
    }

    fn solve(session: &mut GameSession) {
        for (a, b) in pairs(session) {
            session.click(a).unwrap();
            session.click(b).unwrap();
        }
        assert!(session.is_complete());
    }

    #[test]
    fn test_blank_name_rejected_first() {
        let bad_config = GameConfig {
            rows: 9,
            ..config(0)
        };
        let err = GameSession::start("   ", &bad_config).unwrap_err();
        assert!(matches!(err, PexesoError::Core(CoreError::BlankPlayerName)));

        let err = GameSession::start("Ann", &bad_config).unwrap_err();
        assert!(matches!(err, PexesoError::Config(_)));
    }

    #[test]
    fn test_name_is_trimmed() {
        let session = GameSession::start("  Ann ", &config(0)).unwrap();
        assert_eq!(session.player().as_str(), "Ann");
        assert_eq!(session.engine().card_count(), 6);
    }

    #[test]
    fn test_clicks_ignored_while_hide_pending() {
        let mut session = GameSession::start("Ann", &config(60_000)).unwrap();
        let (a, b) = mismatched(&session);

        session.click(a).unwrap();
        let events = session.click(b).unwrap();
        assert!(events.contains(&GameEvent::Mismatch(a, b)));
        assert!(session.is_input_locked());

        let other = (0..6).find(|&p| p != a && p != b).unwrap();
        assert_eq!(session.click(other).unwrap(), vec![GameEvent::Ignored(other)]);
        assert!(!session.engine().card(other).unwrap().is_flipped);
        assert!(matches!(
            session.click(6),
            Err(PexesoError::Core(CoreError::PositionOutOfRange { position: 6, len: 6 }))
        ));

        assert_eq!(session.hide_pending().unwrap(), Some((a, b)));
        assert!(!session.is_input_locked());
        assert!(!session.engine().card(a).unwrap().is_flipped);
        assert!(!session.engine().card(b).unwrap().is_flipped);
        assert_eq!(session.click(other).unwrap(), vec![GameEvent::Flipped(other)]);
        assert_eq!(session.hide_pending().unwrap(), None);
    }

    #[test]
    fn test_hide_if_due_respects_deadline() {
        let mut session = GameSession::start("Ann", &config(60_000)).unwrap();
        let (a, b) = mismatched(&session);
        session.click(a).unwrap();
        session.click(b).unwrap();

        let due = session.hide_deadline().unwrap();
        assert_eq!(session.hide_if_due(Instant::now()).unwrap(), None);
        assert!(session.is_input_locked());
        assert_eq!(session.hide_if_due(due).unwrap(), Some((a, b)));
        assert!(session.hide_deadline().is_none());
    }

    #[tokio::test]
    async fn test_wait_and_hide() {
        let mut session = GameSession::start("Ann", &config(10)).unwrap();
        assert_eq!(session.wait_and_hide().await.unwrap(), None);

        let (a, b) = mismatched(&session);
        session.click(a).unwrap();
        session.click(b).unwrap();
        assert_eq!(session.wait_and_hide().await.unwrap(), Some((a, b)));
        assert!(!session.is_input_locked());
    }

    #[test]
    fn test_result_only_after_completion() {
        let mut session = GameSession::start("Ann", &config(0)).unwrap();
        assert!(session.result().is_none());

        solve(&mut session);
        let result = session.result().unwrap();
        assert_eq!(result.name, "Ann");
        assert_eq!(result.score, 3);
        assert_eq!(result.time, session.elapsed().as_secs());

        let frozen = session.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(session.elapsed(), frozen);
    }

    #[test]
    fn test_restart_clears_state() {
        let mut session = GameSession::start("Ann", &config(60_000)).unwrap();
        let (a, b) = mismatched(&session);
        session.click(a).unwrap();
        session.click(b).unwrap();

        session.restart().unwrap();
        assert!(!session.is_input_locked());
        assert_eq!(session.moves(), 0);
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_record_to_board() {
        let board = ScoreBoard::new(MemoryScoreStore::new());
        let mut session = GameSession::start("Ann", &config(0)).unwrap();
        assert_eq!(session.record(&board).await.unwrap(), None);

        solve(&mut session);
        let id = session.record(&board).await.unwrap().unwrap();

        let all = board.snapshot_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].name, "Ann");
        assert_eq!(all[0].score, 3);
    }

    #[tokio::test]
    async fn test_game_recorded_once() {
        let board = ScoreBoard::new(MemoryScoreStore::new());
        let mut session = GameSession::start("Ann", &config(0)).unwrap();
        solve(&mut session);

        let first = session.record(&board).await.unwrap();
        assert!(first.is_some());
        assert_eq!(session.record(&board).await.unwrap(), first);
        assert_eq!(session.record_best_effort(&board).await, first);
        assert_eq!(session.recorded(), first);
        assert_eq!(board.snapshot_all().await.unwrap().len(), 1);

        session.restart().unwrap();
        assert_eq!(session.recorded(), None);
        solve(&mut session);
        let second = session.record(&board).await.unwrap();
        assert_ne!(second, first);
        assert_eq!(board.snapshot_all().await.unwrap().len(), 2);
    }

    struct FailingStore;

    #[async_trait]
    impl ScoreStore for FailingStore {
        async fn insert_score(&self, _score: &NewScore) -> pexeso_store::Result<ScoreId> {
            Err(StoreError::Storage("disk full".into()))
        }
        async fn restore_score(&self, _record: &ScoreRecord) -> pexeso_store::Result<()> {
            Err(StoreError::Storage("disk full".into()))
        }
        async fn delete_score(&self, _record: &ScoreRecord) -> pexeso_store::Result<usize> {
            Ok(0)
        }
        async fn delete_player(&self, _name: &str) -> pexeso_store::Result<usize> {
            Ok(0)
        }
        async fn delete_all(&self) -> pexeso_store::Result<usize> {
            Ok(0)
        }
        async fn all_scores(&self) -> pexeso_store::Result<Vec<ScoreRecord>> {
            Ok(Vec::new())
        }
        async fn scores_for_player(&self, _name: &str) -> pexeso_store::Result<Vec<ScoreRecord>> {
            Ok(Vec::new())
        }
        async fn get_score(&self, _id: ScoreId) -> pexeso_store::Result<Option<ScoreRecord>> {
            Ok(None)
        }
        async fn count(&self) -> pexeso_store::Result<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_record_failure_is_swallowed() {
        let board = ScoreBoard::new(FailingStore);
        let mut session = GameSession::start("Ann", &config(0)).unwrap();
        solve(&mut session);

        assert!(session.record(&board).await.is_err());
        assert_eq!(session.record_best_effort(&board).await, None);
        assert!(session.is_complete());
    }
}
