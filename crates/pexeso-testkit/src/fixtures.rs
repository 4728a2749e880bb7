//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use pexeso::{GameConfig, GameSession, MemoryScoreStore, Result, ScoreBoard};
use pexeso_core::{FaceId, GameEvent, MatchEngine, NewScore, PlayerName};

/// Faces of the small fixture deck.
pub const SMALL_FACES: [&str; 3] = ["sun", "moon", "star"];

/// A test fixture with a seeded six-card config and a memory score board.
pub struct TestFixture {
    pub config: GameConfig,
    pub board: ScoreBoard<MemoryScoreStore>,
}

impl TestFixture {
    /// Create a fixture with shuffle seed 42.
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Create with a deterministic shuffle seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: small_config(seed),
            board: ScoreBoard::new(MemoryScoreStore::new()),
        }
    }

    /// A fresh engine dealt from the fixture config.
    pub fn engine(&self) -> MatchEngine {
        MatchEngine::seeded(&self.config.faces, self.config.seed.unwrap_or_default())
            .expect("fixture faces are valid")
    }

    /// A fresh session for `name`.
    pub fn session(&self, name: &str) -> GameSession {
        GameSession::start(name, &self.config).expect("fixture config is valid")
    }

    /// A score dated at a fixed instant.
    pub fn score(&self, name: &str, score: u32, time: u64) -> NewScore {
        let player = PlayerName::parse(name).expect("fixture names are not blank");
        NewScore::at(&player, score, time, 1_700_000_000_000)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The six-card 2x3 config used by the fixtures, with no hide delay.
pub fn small_config(seed: u64) -> GameConfig {
    GameConfig {
        faces: SMALL_FACES.into_iter().map(FaceId::from).collect(),
        rows: 2,
        columns: 3,
        hide_delay_ms: 0,
        seed: Some(seed),
        ..GameConfig::default()
    }
}

/// Positions of both cards of every unmatched face, in table order.
pub fn pairs(engine: &MatchEngine) -> Vec<(usize, usize)> {
    let deck = engine.cards_in_play();
    let mut out = Vec::new();
    for (i, card) in deck.iter().enumerate() {
        if card.is_matched {
            continue;
        }
        if let Some(j) = (i + 1..deck.len()).find(|&j| deck[j].face == card.face) {
            out.push((i, j));
        }
    }
    out
}

/// Two face-down, unmatched cards with different faces.
pub fn mismatched_pair(engine: &MatchEngine) -> Option<(usize, usize)> {
    let deck = engine.cards_in_play();
    let open: Vec<usize> = (0..deck.len())
        .filter(|&p| deck[p].is_selectable())
        .collect();

    open.iter().find_map(|&a| {
        open.iter()
            .find(|&&b| deck[b].face != deck[a].face)
            .map(|&b| (a, b))
    })
}

/// Match every remaining pair. Returns all events produced.
pub fn solve(engine: &mut MatchEngine) -> pexeso_core::Result<Vec<GameEvent>> {
    let mut events = Vec::new();
    for (a, b) in pairs(engine) {
        events.extend(engine.select(a)?);
        events.extend(engine.select(b)?);
    }
    Ok(events)
}

/// Play a session to completion, making `mistakes` mismatches first.
///
/// Each mismatch is hidden immediately, as if the hide timer fired. The
/// finished game has `mistakes + pairs` moves.
pub fn play_to_completion(session: &mut GameSession, mistakes: usize) -> Result<Vec<GameEvent>> {
    let mut events = Vec::new();

    for _ in 0..mistakes {
        let Some((a, b)) = mismatched_pair(session.engine()) else {
            break;
        };
        events.extend(session.click(a)?);
        events.extend(session.click(b)?);
        session.hide_pending()?;
    }

    for (a, b) in pairs(session.engine()) {
        events.extend(session.click(a)?);
        events.extend(session.click(b)?);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_engine_is_deterministic() {
        let fixture = TestFixture::with_seed(9);
        assert_eq!(
            fixture.engine().cards_in_play(),
            fixture.engine().cards_in_play()
        );
    }

    #[test]
    fn test_pairs_cover_deck() {
        let engine = TestFixture::new().engine();
        let found = pairs(&engine);
        assert_eq!(found.len(), 3);

        let mut positions: Vec<usize> = found.iter().flat_map(|&(a, b)| [a, b]).collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_solve_completes() {
        let mut engine = TestFixture::new().engine();
        let events = solve(&mut engine).unwrap();

        assert!(engine.is_complete());
        assert_eq!(engine.moves(), 3);
        assert_eq!(events.last(), Some(&GameEvent::GameComplete));
    }

    #[test]
    fn test_play_with_mistakes() {
        let fixture = TestFixture::new();
        let mut session = fixture.session("Ann");
        let events = play_to_completion(&mut session, 2).unwrap();

        assert!(session.is_complete());
        assert_eq!(session.moves(), 5);
        let mismatches = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Mismatch(..)))
            .count();
        assert_eq!(mismatches, 2);
    }

    #[tokio::test]
    async fn test_fixture_board_starts_empty() {
        let fixture = TestFixture::new();
        assert!(fixture.board.snapshot_all().await.unwrap().is_empty());

        fixture.board.add(&fixture.score("Ann", 4, 9)).await.unwrap();
        assert_eq!(fixture.board.snapshot_player("Ann").await.unwrap().len(), 1);
    }
}
