//! # Pexeso Store
//!
//! Score persistence for Pexeso. Provides a trait-based interface for game
//! results with SQLite and in-memory implementations, plus live views that
//! follow the stored data.
//!
//! ## Overview
//!
//! The store module abstracts score storage behind the [`ScoreStore`] trait,
//! keeping the game storage-agnostic. The primary implementation is
//! [`SqliteScoreStore`], with [`MemoryScoreStore`] for testing.
//!
//! ## Key Types
//!
//! - [`ScoreStore`] - The async trait for all storage operations
//! - [`SqliteScoreStore`] - SQLite-based persistent storage
//! - [`MemoryScoreStore`] - In-memory storage for tests
//! - [`ScoreFeed`] / [`Subscription`] - Live views over a store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pexeso_core::{NewScore, PlayerName};
//! use pexeso_store::{ScoreStore, SqliteScoreStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteScoreStore::open("score_database.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteScoreStore::open_memory().unwrap();
//!
//!     let player = PlayerName::parse("Alice").unwrap();
//!     let id = store.insert_score(&NewScore::new(&player, 14, 83)).await.unwrap();
//!     let ranked = store.all_scores().await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Store-assigned ids**: monotonic, never reused after deletion
//! - **Listing order**: `(score, time)` ascending, id breaks ties
//! - **Idempotent deletes**: removing something absent reports 0 rows

pub mod error;
pub mod live;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use live::{ScoreFeed, ScoreQuery, Subscription, SubscriptionId};
pub use memory::MemoryScoreStore;
pub use sqlite::SqliteScoreStore;
pub use traits::ScoreStore;
