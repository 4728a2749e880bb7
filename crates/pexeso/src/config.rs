//! Game configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pexeso_core::{default_faces, validate_faces, FaceId};

use crate::error::{PexesoError, Result};

/// Configuration for a game and its score database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Faces dealt into the deck, two cards each.
    pub faces: Vec<FaceId>,
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub columns: usize,
    /// How long a mismatched pair stays face-up, in milliseconds.
    pub hide_delay_ms: u64,
    /// Fixed shuffle seed. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Location of the score database.
    pub database_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            faces: default_faces(),
            rows: 4,
            columns: 5,
            hide_delay_ms: 2000,
            seed: None,
            database_path: PathBuf::from("score_database.db"),
        }
    }
}

impl GameConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PexesoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the face set and the grid shape.
    pub fn validate(&self) -> Result<()> {
        validate_faces(&self.faces).map_err(|e| PexesoError::Config(e.to_string()))?;

        let cells = self
            .cells()
            .ok_or_else(|| PexesoError::Config("grid too large".into()))?;
        if cells != self.deck_size() {
            return Err(PexesoError::Config(format!(
                "a {}x{} grid has {} cells but the deck has {} cards",
                self.rows,
                self.columns,
                cells,
                self.deck_size()
            )));
        }

        Ok(())
    }

    /// Number of cards dealt.
    pub fn deck_size(&self) -> usize {
        self.faces.len() * 2
    }

    /// Number of grid cells, or `None` if it overflows.
    pub fn cells(&self) -> Option<usize> {
        self.rows.checked_mul(self.columns)
    }

    /// The mismatch hide delay.
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    /// Deck position of a grid cell, row-major.
    pub fn position(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        row.checked_mul(self.columns)?.checked_add(column)
    }

    /// Grid cell of a deck position.
    pub fn coords(&self, position: usize) -> Option<(usize, usize)> {
        let cells = self.cells()?;
        (self.columns > 0 && position < cells)
            .then(|| (position / self.columns, position % self.columns))
    }
}
