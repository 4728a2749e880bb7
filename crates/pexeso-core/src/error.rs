//! Error types for Pexeso Core.

use thiserror::Error;

use crate::types::FaceId;

/// Errors raised by the match engine and record validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A card position outside the deck was selected.
    #[error("position {position} out of range for a deck of {len} cards")]
    PositionOutOfRange { position: usize, len: usize },

    /// A deck needs at least two distinct faces.
    #[error("at least 2 distinct faces are required, got {0}")]
    TooFewFaces(usize),

    /// The same face was listed twice in a face set.
    #[error("face {0} appears more than once in the face set")]
    DuplicateFace(FaceId),

    /// A session was started without a player name.
    #[error("player name must not be blank")]
    BlankPlayerName,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
