//! The match engine: deck, selection buffer, move counting, and resolution.
//!
//! The engine is a small synchronous state machine. The caller reports a card
//! position via [`MatchEngine::select`] and gets back the [`GameEvent`]s the
//! click produced, in order:
//!
//! ```text
//! Ignored(p)
//! Flipped(p)
//! Flipped(p) MatchFound(a, b) [GameComplete]
//! Flipped(p) Mismatch(a, b)
//! ```
//!
//! ## Mismatch policy
//!
//! A mismatched pair stays face-up. The engine has no notion of wall-clock
//! delay; the caller turns the pair face-down with
//! [`MatchEngine::turn_face_down`] once its hide timer fires. Until then the
//! two cards are ignored by `select`.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::card::{self, Card};
use crate::error::{CoreError, Result};
use crate::types::FaceId;

/// Largest number of cards face-up and awaiting comparison.
pub const SELECTION_LIMIT: usize = 2;

/// Outputs of a single [`MatchEngine::select`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The card at this position was turned face-up.
    Flipped(usize),
    /// The click had no effect.
    Ignored(usize),
    /// The two positions hold the same face and are now matched.
    MatchFound(usize, usize),
    /// The two positions hold different faces.
    Mismatch(usize, usize),
    /// Every card is matched. Emitted once per game.
    GameComplete,
}

/// Deck owner and two-card comparison state machine.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    faces: Vec<FaceId>,
    deck: Vec<Card>,
    selection: Vec<usize>,
    moves: u32,
    complete: bool,
    rng: StdRng,
}

impl MatchEngine {
    /// Create an engine seeded from the system clock and deal a game.
    pub fn new(faces: &[FaceId]) -> Result<Self> {
        Self::seeded(faces, clock_seed())
    }

    /// Create an engine with a fixed shuffle seed and deal a game.
    pub fn seeded(faces: &[FaceId], seed: u64) -> Result<Self> {
        let mut engine = Self {
            faces: Vec::new(),
            deck: Vec::new(),
            selection: Vec::with_capacity(SELECTION_LIMIT),
            moves: 0,
            complete: false,
            rng: StdRng::seed_from_u64(seed),
        };
        engine.new_game(faces)?;
        Ok(engine)
    }

    /// Discard the current deck and deal a fresh shuffled one.
    ///
    /// Resets the move counter and clears the selection.
    pub fn new_game(&mut self, faces: &[FaceId]) -> Result<()> {
        let deck = card::deal(faces, &mut self.rng)?;

        self.faces = faces.to_vec();
        self.deck = deck;
        self.selection.clear();
        self.moves = 0;
        self.complete = false;

        debug!(cards = self.deck.len(), "dealt new game");
        Ok(())
    }

    /// Deal again with the same face set.
    pub fn restart(&mut self) -> Result<()> {
        let faces = std::mem::take(&mut self.faces);
        self.new_game(&faces)
    }

    /// Report a click on the card at `position`.
    pub fn select(&mut self, position: usize) -> Result<Vec<GameEvent>> {
        let len = self.deck.len();
        let card = self
            .deck
            .get_mut(position)
            .ok_or(CoreError::PositionOutOfRange { position, len })?;

        if !card.is_selectable() || self.selection.len() >= SELECTION_LIMIT {
            trace!(position, "selection ignored");
            return Ok(vec![GameEvent::Ignored(position)]);
        }

        card.is_flipped = true;
        self.selection.push(position);

        let mut events = vec![GameEvent::Flipped(position)];
        if self.selection.len() == SELECTION_LIMIT {
            self.moves += 1;
            debug!(moves = self.moves, "number of moves");

            events.push(self.resolve());

            if !self.complete && self.deck.iter().all(|c| c.is_matched) {
                self.complete = true;
                info!(moves = self.moves, "game complete");
                events.push(GameEvent::GameComplete);
            }
        }

        Ok(events)
    }

    /// Compare the two selected cards and clear the buffer.
    fn resolve(&mut self) -> GameEvent {
        let (a, b) = (self.selection[0], self.selection[1]);
        self.selection.clear();

        if self.deck[a].face == self.deck[b].face {
            self.deck[a].is_matched = true;
            self.deck[b].is_matched = true;
            GameEvent::MatchFound(a, b)
        } else {
            GameEvent::Mismatch(a, b)
        }
    }

    /// Turn unmatched cards face-down again, typically a mismatched pair.
    ///
    /// Matched cards and cards in the current selection are left face-up.
    /// Fails without changing anything if any position is out of range.
    pub fn turn_face_down(&mut self, positions: &[usize]) -> Result<()> {
        let len = self.deck.len();
        if let Some(&position) = positions.iter().find(|&&p| p >= len) {
            return Err(CoreError::PositionOutOfRange { position, len });
        }

        for &position in positions {
            if self.selection.contains(&position) {
                continue;
            }
            let card = &mut self.deck[position];
            if !card.is_matched {
                card.is_flipped = false;
            }
        }

        Ok(())
    }

    /// Snapshot of the deck in table order.
    pub fn cards_in_play(&self) -> Vec<Card> {
        self.deck.clone()
    }

    /// The card at a position, if any.
    pub fn card(&self, position: usize) -> Option<&Card> {
        self.deck.get(position)
    }

    /// Snapshot of the cards face-up and awaiting comparison (0 to 2).
    pub fn current_selection(&self) -> Vec<Card> {
        self.selection.iter().map(|&p| self.deck[p].clone()).collect()
    }

    /// Number of resolved two-card comparisons in this game.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Whether every card has been matched.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Pairs matched so far.
    pub fn pairs_found(&self) -> usize {
        self.deck.iter().filter(|c| c.is_matched).count() / 2
    }

    /// Cards in the deck.
    pub fn card_count(&self) -> usize {
        self.deck.len()
    }

    /// Pairs in the deck.
    pub fn pair_count(&self) -> usize {
        self.deck.len() / 2
    }

    /// The face set the current deck was dealt from.
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
