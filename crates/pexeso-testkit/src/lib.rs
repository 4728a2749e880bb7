//! # Pexeso Testkit
//!
//! Testing utilities for Pexeso.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A seeded config and an in-memory score board, plus helpers
//!   that find pairs and play games to completion
//! - **Generators**: Proptest strategies for face sets, player names, and
//!   score parameters
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pexeso_testkit::generators::{score_from_params, ScoreParams};
//!
//! proptest! {
//!     #[test]
//!     fn name_survives(params: ScoreParams) {
//!         let score = score_from_params(&params);
//!         prop_assert_eq!(score.name, params.name.as_str());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use pexeso_testkit::fixtures::{solve, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let mut engine = fixture.engine();
//! solve(&mut engine).unwrap();
//! assert!(engine.is_complete());
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{mismatched_pair, pairs, play_to_completion, solve, TestFixture};
pub use generators::{score_from_params, ScoreParams};
