//! # Pexeso Core
//!
//! Pure primitives for the Pexeso memory game: cards, the match engine, and
//! score records.
//!
//! This crate contains no I/O, no storage, no clocks beyond the shuffle seed
//! and record timestamps. It is plain game logic.
//!
//! ## Key Types
//!
//! - [`MatchEngine`] - Deck owner and two-card comparison state machine
//! - [`GameEvent`] - Closed set of outputs from [`MatchEngine::select`]
//! - [`Card`] - One card on the table
//! - [`ScoreRecord`] / [`NewScore`] - Persisted game results
//! - [`PlayerName`] - Validated, non-blank player name
//!
//! ## Usage
//!
//! ```rust
//! use pexeso_core::{default_faces, GameEvent, MatchEngine};
//!
//! let mut engine = MatchEngine::seeded(&default_faces(), 42).unwrap();
//! assert_eq!(engine.cards_in_play().len(), 20);
//!
//! let events = engine.select(0).unwrap();
//! assert_eq!(events, vec![GameEvent::Flipped(0)]);
//! ```

pub mod card;
pub mod engine;
pub mod error;
pub mod score;
pub mod types;

pub use card::{build_deck, deal, default_faces, validate_faces, Card, DEFAULT_FACES, MIN_FACES};
pub use engine::{GameEvent, MatchEngine, SELECTION_LIMIT};
pub use error::{CoreError, Result};
pub use score::{now_millis, sort_by_rank, NewScore, ScoreRecord};
pub use types::{FaceId, PlayerName, ScoreId};
