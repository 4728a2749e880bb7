//! # Pexeso
//!
//! The unified API for the Pexeso memory game: play a game, record the
//! result, and follow the score board as it changes.
//!
//! ## Overview
//!
//! - **Sessions**: One player's game with its clock and mismatch hide timer
//! - **Score board**: Persisted results with live, sorted views
//! - **Config**: Face set, grid shape, hide delay, and database location
//!
//! ## Key Concepts
//!
//! - **Move**: One resolved comparison of two face-up cards.
//! - **Score**: The number of moves a finished game took. Lower is better.
//! - **Live view**: A subscription that receives the full sorted list again
//!   after every change to the records it covers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pexeso::{GameConfig, GameSession, ScoreBoard};
//!
//! async fn example() {
//!     let config = GameConfig::default();
//!     let board = ScoreBoard::open(&config.database_path).unwrap();
//!     let mut view = board.all_scores().await.unwrap();
//!
//!     let mut session = GameSession::start("Alice", &config).unwrap();
//!     let _events = session.click(0).unwrap();
//!
//!     // ... play until session.is_complete() ...
//!
//!     session.record_best_effort(&board).await;
//!     let _sorted = view.recv().await;
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `pexeso::core` - Cards, the match engine, and score records
//! - `pexeso::store` - Storage abstraction, SQLite, and live feeds

pub mod board;
pub mod config;
pub mod error;
pub mod session;

// Re-export component crates
pub use pexeso_core as core;
pub use pexeso_store as store;

// Re-export main types for convenience
pub use board::ScoreBoard;
pub use config::GameConfig;
pub use error::{PexesoError, Result};
pub use session::GameSession;

// Re-export commonly used types
pub use pexeso_core::{
    Card, FaceId, GameEvent, MatchEngine, NewScore, PlayerName, ScoreId, ScoreRecord,
};
pub use pexeso_store::{
    MemoryScoreStore, ScoreQuery, ScoreStore, SqliteScoreStore, Subscription, SubscriptionId,
};
